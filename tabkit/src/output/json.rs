//! JSON exporter: the render model as-is, for consumers in other processes.

use super::Exporter;
use crate::error::TabkitError;
use crate::render::RenderModel;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: indent the output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for JsonExporter {
    fn export(&self, model: &RenderModel) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        };
        json.map_err(|e| TabkitError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnSpec, Footnote};
    use crate::data::Dataset;
    use crate::render::render;

    #[test]
    fn test_json_shape() {
        let data = Dataset::new(["a"], vec![vec![1.into()]]).unwrap();
        let model = render(&data, &ColumnSpec::select(["a"]), &[Footnote::header("a", "note")]).unwrap();
        let json = JsonExporter::new().export(&model).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("title").is_none());
        assert_eq!(parsed["headers"][0]["label"], "a");
        assert_eq!(parsed["headers"][0]["align"], "right");
        assert_eq!(parsed["rows"][0][0]["content"]["value"], "1");
        assert_eq!(parsed["footnotes"][0]["mark"], "1");

        let back: RenderModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_pretty() {
        let data = Dataset::new(["a"], vec![]).unwrap();
        let model = render(&data, &ColumnSpec::select(["a"]), &[]).unwrap();
        assert!(JsonExporter::new().pretty(true).export(&model).unwrap().contains('\n'));
        assert!(!JsonExporter::new().export(&model).unwrap().contains('\n'));
    }
}
