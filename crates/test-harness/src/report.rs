//! Structured text reports of parts and their names.
//!
//! Reports are plain text, meant to be printed when a scenario fails.

use std::fmt;

use topo_types::{Provenance, TopoCounts};

use crate::helpers::HarnessError;
use crate::oracle::OracleVerdict;
use crate::workflow::PartBuilder;

/// A complete report over every part in a builder.
pub struct PartReport {
    pub part_entries: Vec<PartEntry>,
    pub oracle_results: Vec<OracleVerdict>,
    pub diagnostics: Vec<(String, String)>,
}

/// A single part's report entry.
pub struct PartEntry {
    pub name: String,
    pub counts: TopoCounts,
    pub capped: bool,
    /// (tag, origin) per face, in shell order.
    pub faces: Vec<(String, String)>,
    pub tagged_edges: usize,
}

impl PartReport {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Part Report ===\n\n");

        out.push_str(&format!("Parts ({}):\n", self.part_entries.len()));
        for entry in &self.part_entries {
            let cap = if entry.capped { "" } else { " [OPEN]" };
            out.push_str(&format!("  \"{}\"{}: {}\n", entry.name, cap, entry.counts));
            for (tag, origin) in &entry.faces {
                let tag = if tag.is_empty() { "<untagged>" } else { tag };
                out.push_str(&format!("      face {} ({})\n", tag, origin));
            }
            out.push_str(&format!(
                "      {}/{} edges tagged\n",
                entry.tagged_edges, entry.counts.edges
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!("\nOracle Results ({} checks):\n", self.oracle_results.len()));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        if self.diagnostics.is_empty() {
            out.push_str("\nDiagnostics: none\n");
        } else {
            out.push_str(&format!("\nDiagnostics ({}):\n", self.diagnostics.len()));
            for (part, msg) in &self.diagnostics {
                out.push_str(&format!("  {}: {}\n", part, msg));
            }
        }

        out
    }
}

impl fmt::Display for PartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl PartBuilder {
    /// Generate a report over every part, in creation order.
    pub fn report(&self) -> Result<PartReport, HarnessError> {
        let mut part_entries = Vec::new();
        let mut oracle_results = Vec::new();
        let mut diagnostics = Vec::new();

        let names: Vec<&str> = self
            .history()
            .iter()
            .filter(|(_, op)| op == "Extrude" || op.starts_with("Regenerate"))
            .map(|(name, _)| name.as_str())
            .collect();

        for name in names {
            let part = self.part(name)?;
            let store = &self.store;
            let faces = store
                .shell_faces(part.shell)
                .iter()
                .map(|&f| {
                    let face = &store.faces[f];
                    (face.tag.clone(), describe_origin(face.provenance.as_ref()))
                })
                .collect();
            let tagged_edges = store
                .shell_edges(part.shell)
                .into_iter()
                .filter(|&e| !store.edges[e].tag.is_empty())
                .count();

            if part.capped {
                let genus = part.sketch.faces.first().map_or(0, |f| f.holes.len() as i64);
                oracle_results.extend(self.check_topology(name, genus)?);
            }
            if let Some(report) = self.naming_report(name) {
                oracle_results.extend(self.check_naming(name)?);
                diagnostics.extend(report.diagnostics.iter().map(|d| (name.to_string(), d.to_string())));
            }

            part_entries.push(PartEntry {
                name: name.to_string(),
                counts: store.count_topology(part.shell),
                capped: part.capped,
                faces,
                tagged_edges,
            });
        }

        Ok(PartReport {
            part_entries,
            oracle_results,
            diagnostics,
        })
    }
}

/// Describe where a face's name came from.
fn describe_origin(provenance: Option<&Provenance>) -> String {
    match provenance {
        None => "unnamed".to_string(),
        Some(Provenance::Face(p)) => {
            let role = serde_json::to_value(p.face_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            format!("{} from {}", role, p.sketch_com_id)
        }
        Some(p) => format!("from {}", p.sketch_com_id()),
    }
}
