pub struct DefaultsConfig {
    pub branch: String,
    pub ncores: usize,
    pub build_type: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            ncores: 8,
            build_type: "Release".to_string(),
        }
    }
}
