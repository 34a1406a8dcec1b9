/// A controller site: a named administrative grouping of devices.
///
/// `name` is the controller's internal identifier used in API paths;
/// `description` is the human-facing label that metrics carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}
