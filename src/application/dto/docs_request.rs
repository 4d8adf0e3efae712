use crate::health::domain::DocSection;

/// DocsRequest - Internal request DTO for the documentation lookup
#[derive(Debug, Clone)]
pub struct DocsRequest {
    pub package_name: String,
    /// Keywords; only lines near a hit are kept when set
    pub query: Option<String>,
    pub section: DocSection,
}

impl DocsRequest {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            query: None,
            section: DocSection::All,
        }
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        // A blank query filters nothing
        self.query = query.filter(|q| !q.trim().is_empty());
        self
    }

    pub fn with_section(mut self, section: DocSection) -> Self {
        self.section = section;
        self
    }
}
