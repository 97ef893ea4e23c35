//! PartBuilder: a fluent API for scripting sketch, extrude, name and match
//! sequences in tests.
//!
//! All methods accept string names instead of arena keys for readability.
//! A part remembers the sketch it was extruded from, so it can be
//! regenerated at another position and matched against its earlier self.

use std::collections::HashMap;

use cad_kernel::geometry::curves::Curve2d;
use cad_kernel::geometry::projection::SketchPlane;
use cad_kernel::geometry::vector::Vec3;
use cad_kernel::topology::brep::{EntityStore, FaceId, HalfEdgeId, ShellId};
use cad_kernel::topology::builders::{make_extrusion, make_open_extrusion};
use cad_kernel::Tolerance;
use topo_naming::{BrepMatcher, NamingReport, ShellRef, SketchData, SketchNamer};
use topo_types::TopoCounts;

use crate::helpers::*;
use crate::oracle::{self, OracleVerdict};

/// A shell built by the builder, with what is needed to rebuild it.
#[derive(Debug, Clone)]
pub struct Part {
    pub shell: ShellId,
    pub sketch: SketchData,
    pub height: f64,
    pub capped: bool,
}

/// A fluent builder for constructing, naming and matching extruded parts.
pub struct PartBuilder {
    pub store: EntityStore,
    tol: Tolerance,
    sketches: HashMap<String, SketchData>,
    parts: HashMap<String, Part>,
    reports: HashMap<String, NamingReport>,
    history: Vec<(String, String)>,
    auto_check: bool,
}

impl Default for PartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartBuilder {
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    pub fn with_tolerance(tol: Tolerance) -> Self {
        Self {
            store: EntityStore::new(),
            tol,
            sketches: HashMap::new(),
            parts: HashMap::new(),
            reports: HashMap::new(),
            history: Vec::new(),
            auto_check: false,
        }
    }

    /// Enable auto-checking: every naming pass must finish without failures.
    pub fn with_auto_check(mut self) -> Self {
        self.auto_check = true;
        self
    }

    // ── Sketch Shortcuts ────────────────────────────────────────────────

    /// Register a sketch whose single face is the given closed profile.
    /// The face takes the sketch's name as its id.
    pub fn profile_sketch(&mut self, name: &str, plane: SketchPlane, profile: Vec<Curve2d>) -> Result<(), HarnessError> {
        self.check_name_available(name)?;
        let sketch = sketch_from_profiles(plane, &[(name, profile)]);
        self.sketches.insert(name.to_string(), sketch);
        self.history.push((name.to_string(), "Sketch".to_string()));
        Ok(())
    }

    pub fn rect_sketch(&mut self, name: &str, plane: SketchPlane, x: f64, y: f64, w: f64, h: f64) -> Result<(), HarnessError> {
        self.profile_sketch(name, plane, rect_profile(x, y, w, h))
    }

    pub fn circle_sketch(&mut self, name: &str, plane: SketchPlane, cx: f64, cy: f64, r: f64) -> Result<(), HarnessError> {
        self.profile_sketch(name, plane, circle_profile(cx, cy, r))
    }

    pub fn slot_sketch(
        &mut self,
        name: &str,
        plane: SketchPlane,
        x: f64,
        y: f64,
        length: f64,
        r: f64,
    ) -> Result<(), HarnessError> {
        self.profile_sketch(name, plane, slot_profile(x, y, length, r))
    }

    /// Add a hole profile to the first face of an existing sketch.
    pub fn add_hole(&mut self, sketch: &str, hole: Vec<Curve2d>) -> Result<(), HarnessError> {
        let data = self
            .sketches
            .get_mut(sketch)
            .ok_or_else(|| HarnessError::PartNotFound { name: sketch.to_string() })?;
        let index = data.faces.first().map_or(0, |f| f.holes.len());
        let face = data
            .faces
            .first_mut()
            .ok_or_else(|| HarnessError::PartNotFound { name: sketch.to_string() })?;
        let id = format!("{}-h{}", face.id, index);
        for (i, curve) in hole.iter().enumerate() {
            data.curves.push(topo_naming::SketchCurve {
                id: format!("{id}-c{i}"),
                curve: *curve,
            });
            data.points.push(topo_naming::SketchPoint {
                id: format!("{id}-p{i}"),
                position: curve.start_point(),
            });
        }
        face.holes.push(hole);
        Ok(())
    }

    // ── Extrusion ───────────────────────────────────────────────────────

    /// Extrude a sketch into a closed part.
    pub fn extrude(&mut self, name: &str, sketch: &str, height: f64) -> Result<ShellId, HarnessError> {
        self.build_part(name, sketch, height, true)
    }

    /// Extrude a sketch without its top face.
    pub fn extrude_open(&mut self, name: &str, sketch: &str, height: f64) -> Result<ShellId, HarnessError> {
        self.build_part(name, sketch, height, false)
    }

    fn build_part(&mut self, name: &str, sketch: &str, height: f64, capped: bool) -> Result<ShellId, HarnessError> {
        self.check_name_available(name)?;
        let data = self
            .sketches
            .get(sketch)
            .cloned()
            .ok_or_else(|| HarnessError::PartNotFound { name: sketch.to_string() })?;
        let shell = self.extrude_sketch(&data, height, capped)?;
        self.parts.insert(
            name.to_string(),
            Part {
                shell,
                sketch: data,
                height,
                capped,
            },
        );
        self.history.push((name.to_string(), "Extrude".to_string()));
        Ok(shell)
    }

    fn extrude_sketch(&mut self, sketch: &SketchData, height: f64, capped: bool) -> Result<ShellId, HarnessError> {
        let face = sketch.faces.first().ok_or_else(|| HarnessError::AssertionFailed {
            detail: "sketch has no face to extrude".into(),
        })?;
        let build = if capped { make_extrusion } else { make_open_extrusion };
        Ok(build(
            &mut self.store,
            &sketch.plane,
            &face.outer_loop,
            &face.holes,
            height,
            &self.tol,
        )?)
    }

    /// Rebuild a part with its sketch plane moved by `offset`, as a
    /// regeneration would after an upstream edit.
    pub fn regenerate(&mut self, name: &str, from: &str, offset: Vec3) -> Result<ShellId, HarnessError> {
        self.check_name_available(name)?;
        let mut part = self.part(from)?.clone();
        part.sketch.plane.origin = part.sketch.plane.origin + offset;
        part.shell = self.extrude_sketch(&part.sketch, part.height, part.capped)?;
        let shell = part.shell;
        self.parts.insert(name.to_string(), part);
        self.history.push((name.to_string(), format!("Regenerate({from})")));
        Ok(shell)
    }

    // ── Naming and Matching ─────────────────────────────────────────────

    /// Run the sketch namer over a part.
    pub fn name_part(&mut self, name: &str) -> Result<NamingReport, HarnessError> {
        let part = self.part(name)?.clone();
        let namer = SketchNamer::new(self.tol);
        let report = namer.reconstruct_names(&mut self.store, &[part.shell], &part.sketch);
        self.history.push((name.to_string(), "Name".to_string()));
        self.reports.insert(name.to_string(), report.clone());

        if self.auto_check {
            let failures = report.failures();
            if !failures.is_empty() {
                let lines: Vec<String> = failures.iter().map(|d| format!("  {d}")).collect();
                return Err(HarnessError::AssertionFailed {
                    detail: format!("naming {} left failures:\n{}", name, lines.join("\n")),
                });
            }
        }
        Ok(report)
    }

    pub fn match_face(&self, from: &str, to: &str, tag: &str) -> Result<FaceId, HarnessError> {
        let matcher = BrepMatcher::new(self.tol);
        Ok(matcher.match_face(self.shell_ref(from)?, tag, self.shell_ref(to)?)?)
    }

    pub fn match_path<S: AsRef<str>>(&self, from: &str, to: &str, tags: &[S]) -> Result<Vec<HalfEdgeId>, HarnessError> {
        let matcher = BrepMatcher::new(self.tol);
        Ok(matcher.match_coedge_path(self.shell_ref(from)?, tags, self.shell_ref(to)?)?)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn part(&self, name: &str) -> Result<&Part, HarnessError> {
        self.parts
            .get(name)
            .ok_or_else(|| HarnessError::PartNotFound { name: name.to_string() })
    }

    pub fn shell(&self, name: &str) -> Result<ShellId, HarnessError> {
        Ok(self.part(name)?.shell)
    }

    pub fn shell_ref(&self, name: &str) -> Result<ShellRef<'_>, HarnessError> {
        Ok(ShellRef::new(&self.store, self.shell(name)?))
    }

    pub fn topology_counts(&self, name: &str) -> Result<TopoCounts, HarnessError> {
        Ok(self.store.count_topology(self.shell(name)?))
    }

    pub fn face_tags(&self, name: &str) -> Result<Vec<String>, HarnessError> {
        let shell = self.shell(name)?;
        Ok(self
            .store
            .shell_faces(shell)
            .iter()
            .map(|&f| self.store.faces[f].tag.clone())
            .collect())
    }

    /// The report of the most recent naming pass over a part.
    pub fn naming_report(&self, name: &str) -> Option<&NamingReport> {
        self.reports.get(name)
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Get the operation history as (name, operation) pairs.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    // ── Assertions ──────────────────────────────────────────────────────

    pub fn assert_counts(&self, name: &str, v: usize, e: usize, f: usize) -> Result<&Self, HarnessError> {
        crate::assertions::assert_topology_eq(&self.store, self.shell(name)?, v, e, f, name)?;
        Ok(self)
    }

    pub fn assert_face_tagged(&self, name: &str, tag: &str) -> Result<&Self, HarnessError> {
        let tags = self.face_tags(name)?;
        if tags.iter().any(|t| t == tag) {
            Ok(self)
        } else {
            Err(HarnessError::AssertionFailed {
                detail: format!("[{}] no face tagged {:?}. Available: [{}]", name, tag, tags.join(", ")),
            })
        }
    }

    /// Structural checks; pass `genus` for closed parts.
    pub fn check_topology(&self, name: &str, genus: i64) -> Result<Vec<OracleVerdict>, HarnessError> {
        Ok(oracle::run_shell_checks(&self.store, self.shell(name)?, genus, &self.tol))
    }

    pub fn check_naming(&self, name: &str) -> Result<Vec<OracleVerdict>, HarnessError> {
        Ok(oracle::run_naming_checks(&self.store, self.shell(name)?))
    }

    // ── Save ────────────────────────────────────────────────────────────

    /// Serialize a part's sketch, for reproducing a failure outside the test.
    pub fn sketch_json(&self, name: &str) -> Result<String, HarnessError> {
        serde_json::to_string_pretty(&self.part(name)?.sketch).map_err(|e| HarnessError::Serialize(e.to_string()))
    }

    fn check_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.sketches.contains_key(name) || self.parts.contains_key(name) {
            return Err(HarnessError::DuplicateName { name: name.to_string() });
        }
        Ok(())
    }
}
