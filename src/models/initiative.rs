#[derive(Debug, Clone)]
pub struct Initiative {
    pub id: Option<i64>,
    pub name: String,
    /// Leader's employee name, matched exactly by the "mine" filter.
    pub leader: String,
    pub status: String,
}

impl Initiative {
    pub fn new(name: String, leader: String) -> Self {
        Self {
            id: None,
            name,
            leader,
            status: "Active".to_string(),
        }
    }
}
