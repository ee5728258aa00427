//! Emission configuration
//!
//! Controls the parts of the output that are not decided by the tree: namespace wrapping, the
//! interface unit's file name, indentation and the banner line.

/// Emission configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Optional enclosing namespace for both units
    pub namespace: Option<String>,
    /// File name of the interface unit, referenced by the implementation unit
    pub interface_file: String,
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Banner written as the first line of both units
    pub banner: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            interface_file: "output.hpp".to_string(),
            indent_width: 4,
            banner: "Generated automatically with \"ember\". Do not edit.".to_string(),
        }
    }
}

impl EmitConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap both units in a namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Set the interface unit file name
    pub fn with_interface_file(mut self, file: &str) -> Self {
        self.interface_file = file.to_string();
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the banner text
    pub fn with_banner(mut self, banner: &str) -> Self {
        self.banner = banner.to_string();
        self
    }
}
