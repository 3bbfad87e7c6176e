use serde::Deserialize;

/// Root of a topology file.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    /// Named link presets referenced by hubs and links.
    #[serde(default)]
    pub link_profiles: Vec<LinkProfileDto>,

    /// Vertices that must exist even without any link (isolated hosts).
    #[serde(default)]
    pub vertices: Vec<String>,

    /// Adjacency shorthand: a hub linked to each neighbor with the same profile.
    #[serde(default)]
    pub hubs: Vec<HubDto>,

    #[serde(default)]
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LinkProfileDto {
    pub name: String,
    pub distance: Option<f64>,
    pub transmission_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HubDto {
    pub id: String,
    pub profile: String,
    pub neighbors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub a: String,
    pub b: String,
    pub profile: Option<String>,
    pub distance: Option<f64>,
    pub transmission_rate: Option<f64>,
}
