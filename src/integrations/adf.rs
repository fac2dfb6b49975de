//! Atlassian Document Format
//!
//! REST v3 sends and expects rich text (descriptions, comments, worklog
//! comments) as ADF JSON. Only the subset needed for plain paragraphs is
//! built here; reading tolerates any node type and keeps its text.

use serde::{Deserialize, Serialize};

/// Top-level ADF document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: u32,
    #[serde(default)]
    pub content: Vec<AdfNode>,
}

/// Any ADF node; marks and attrs are dropped on read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<AdfNode>,
}

impl AdfNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            node_type: "text".to_string(),
            text: Some(text.into()),
            content: Vec::new(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            node_type: "paragraph".to_string(),
            text: None,
            content: vec![Self::text(text)],
        }
    }

    fn is_block(&self) -> bool {
        matches!(
            self.node_type.as_str(),
            "paragraph"
                | "heading"
                | "blockquote"
                | "codeBlock"
                | "bulletList"
                | "orderedList"
                | "listItem"
                | "panel"
                | "rule"
        )
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type.as_str() {
            "text" => out.push_str(self.text.as_deref().unwrap_or_default()),
            "hardBreak" => out.push('\n'),
            _ => {
                for child in &self.content {
                    child.collect_text(out);
                    if child.is_block() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

impl AdfDocument {
    fn new(content: Vec<AdfNode>) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: 1,
            content,
        }
    }

    /// One paragraph holding `text` as-is, newlines included
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(vec![AdfNode::paragraph(text)])
    }

    /// One paragraph per non-blank line; `None` when nothing is left
    pub fn from_lines(text: &str) -> Option<Self> {
        let content: Vec<AdfNode> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(AdfNode::paragraph)
            .collect();

        if content.is_empty() {
            None
        } else {
            Some(Self::new(content))
        }
    }

    /// Text content, one line per block
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|node| {
                let mut block = String::new();
                node.collect_text(&mut block);
                block.trim_end().to_string()
            })
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paragraph_wire_shape() {
        let doc = AdfDocument::paragraph("Looks good");
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "Looks good"}]}
                ]
            })
        );
    }

    #[test]
    fn test_from_lines_skips_blank_lines() {
        let doc = AdfDocument::from_lines("first\n\n  \nsecond").unwrap();
        assert_eq!(doc.content.len(), 2);
        assert_eq!(doc.plain_text(), "first\nsecond");
    }

    #[test]
    fn test_from_lines_empty_is_none() {
        assert!(AdfDocument::from_lines("").is_none());
        assert!(AdfDocument::from_lines("\n   \n").is_none());
    }

    #[test]
    fn test_plain_text_reads_foreign_nodes() {
        let doc: AdfDocument = serde_json::from_value(json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Steps"}]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "open app", "marks": [{"type": "strong"}]}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [
                            {"type": "text", "text": "tap"},
                            {"type": "hardBreak"},
                            {"type": "text", "text": "crash"}
                        ]}
                    ]}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(doc.plain_text(), "Steps\nopen app\ntap\ncrash");
    }
}
