//! Conversion of an XML graph description (`<node>` and `<edge
//! source=".." target=".." weight=".."/>` elements at any depth) to
//! the edge list format read by the MST programs:
//!
//! ```text
//! # Vertices 3 Edges 2
//! # FromNodeId ToNodeId Weight
//! 1 2 4.0
//! 2 3 1.5
//! ```

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

use crate::io_utils::tempfile_utils::write_file_atomically;

#[derive(Debug, thiserror::Error)]
pub enum GraphXmlError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("<edge> element at {row}:{col} is missing the {attribute:?} attribute")]
    MissingAttribute {
        attribute: &'static str,
        row: u32,
        col: u32,
    },
}

/// Attribute values are kept verbatim, no numeric conversion
/// happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlGraph {
    pub num_vertices: usize,
    /// In document order
    pub edges: Vec<GraphEdge>,
}

impl XmlGraph {
    pub fn from_xml_str(xml: &str) -> Result<Self, GraphXmlError> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut num_vertices = 0;
        let mut edges = Vec::new();
        // Below the root element, like ".//node" in ElementTree
        for node in doc.root_element().descendants().skip(1) {
            if node.has_tag_name("node") {
                num_vertices += 1;
            } else if node.has_tag_name("edge") {
                let attribute = |attribute: &'static str| {
                    node.attribute(attribute).map(String::from).ok_or_else(|| {
                        let pos = doc.text_pos_at(node.range().start);
                        GraphXmlError::MissingAttribute {
                            attribute,
                            row: pos.row,
                            col: pos.col,
                        }
                    })
                };
                edges.push(GraphEdge {
                    source: attribute("source")?,
                    target: attribute("target")?,
                    weight: attribute("weight")?,
                });
            }
        }
        Ok(XmlGraph {
            num_vertices,
            edges,
        })
    }

    pub fn write_edge_list(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "# Vertices {} Edges {}",
            self.num_vertices,
            self.edges.len()
        )?;
        writeln!(out, "# FromNodeId ToNodeId Weight")?;
        for GraphEdge {
            source,
            target,
            weight,
        } in &self.edges
        {
            writeln!(out, "{source} {target} {weight}")?;
        }
        Ok(())
    }
}

/// The path of the edge list written for `xml_path`: same directory
/// and base name, extension `txt`.
pub fn edge_list_path(xml_path: &Path) -> PathBuf {
    xml_path.with_extension("txt")
}

/// Convert the XML file at `xml_path`, returning the path written.
pub fn convert_xml_file(xml_path: &Path) -> Result<PathBuf> {
    let xml = std::fs::read_to_string(xml_path)
        .with_context(|| anyhow!("reading XML file {xml_path:?}"))?;
    let graph = XmlGraph::from_xml_str(&xml)
        .with_context(|| anyhow!("parsing graph from {xml_path:?}"))?;
    let out_path = edge_list_path(xml_path);
    if out_path == xml_path {
        anyhow::bail!("input file {xml_path:?} already has the output extension")
    }
    write_file_atomically(&out_path, |out| graph.write_edge_list(out))
        .with_context(|| anyhow!("writing edge list to {out_path:?}"))?;
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml>
  <graph edgedefault="undirected">
    <node id="1"/>
    <node id="2"/>
    <node id="3"/>
    <edge source="1" target="2" weight="4.0"/>
    <edge source="2" target="3" weight="1.5"/>
  </graph>
</graphml>
"#;

    fn edge_list(graph: &XmlGraph) -> String {
        let mut out = Vec::new();
        graph.write_edge_list(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn t_three_nodes_two_edges() {
        let graph = XmlGraph::from_xml_str(GRAPH).unwrap();
        assert_eq!(graph.num_vertices, 3);
        assert_eq!(
            edge_list(&graph),
            "# Vertices 3 Edges 2\n\
             # FromNodeId ToNodeId Weight\n\
             1 2 4.0\n\
             2 3 1.5\n"
        );
    }

    #[test]
    fn t_document_order_and_depth() {
        let xml = r#"<g>
            <edge source="b" target="c" weight="7"/>
            <nodes><node/><group><node/></group></nodes>
            <edge source="a" target="b" weight="0.25"/>
        </g>"#;
        let graph = XmlGraph::from_xml_str(xml).unwrap();
        assert_eq!(graph.num_vertices, 2);
        let sources: Vec<_> = graph.edges.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, ["b", "a"]);
    }

    #[test]
    fn t_root_element_is_not_counted() {
        let graph = XmlGraph::from_xml_str("<node><node/></node>").unwrap();
        assert_eq!(graph.num_vertices, 1);
        assert_eq!(edge_list(&graph), "# Vertices 1 Edges 0\n# FromNodeId ToNodeId Weight\n");
    }

    #[test]
    fn t_errors() {
        match XmlGraph::from_xml_str("<g>\n  <edge source=\"1\" target=\"2\"/>\n</g>") {
            Err(GraphXmlError::MissingAttribute {
                attribute: "weight",
                row: 2,
                col: 3,
            }) => (),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            XmlGraph::from_xml_str("<g><edge></g>"),
            Err(GraphXmlError::Xml(_))
        ));
    }

    #[test]
    fn t_edge_list_path() {
        assert_eq!(
            edge_list_path(Path::new("graphs/road.xml")),
            PathBuf::from("graphs/road.txt")
        );
        assert_eq!(edge_list_path(Path::new("g")), PathBuf::from("g.txt"));
    }
}
