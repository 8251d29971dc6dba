//! Drift detection for a single project
//!
//! Resolves every upstream, then every downstream, into name-keyed maps and
//! compares each upstream name against its downstream counterpart. Any
//! mismatch (including a missing downstream) means the project needs a
//! rebuild.

use crate::domain::{Comparison, DriftDecision, DriftReport, Project, ReferenceSource, Side};
use crate::error::DetectError;
use crate::resolver::Resolver;
use std::collections::{BTreeMap, HashMap};

/// Name-keyed resolved identifiers for one side of a project
pub type ResolvedRefs = HashMap<String, String>;

/// Drift detector over a resolver
pub struct DriftDetector {
    resolver: Resolver,
}

impl DriftDetector {
    /// Create a new detector
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Resolve both sides of a project and decide whether it drifted
    pub async fn detect(&self, project: &Project) -> Result<DriftReport, DetectError> {
        let upstream = self
            .resolve_side(project, Side::Upstream, &project.upstreams)
            .await?;
        let downstream = self
            .resolve_side(project, Side::Downstream, &project.downstreams)
            .await?;

        let (decision, comparisons) = compare(&upstream, &downstream);
        Ok(DriftReport {
            project: project.name.clone(),
            decision,
            comparisons,
        })
    }

    /// Resolve one side in order; later duplicates overwrite earlier ones
    async fn resolve_side(
        &self,
        project: &Project,
        side: Side,
        sources: &[ReferenceSource],
    ) -> Result<ResolvedRefs, DetectError> {
        let mut refs = ResolvedRefs::with_capacity(sources.len());

        for source in sources {
            let resolution = self.resolver.resolve(source).await.map_err(|e| DetectError {
                project: project.name.clone(),
                side,
                source_name: source.name.clone(),
                kind: source.kind_name(),
                source: e,
            })?;
            refs.insert(source.name.clone(), resolution.into_identifier());
        }

        Ok(refs)
    }
}

/// Compare upstream identifiers against downstream ones by name
///
/// Names only present downstream are ignored. Comparisons are returned
/// sorted by name.
pub fn compare(
    upstream: &ResolvedRefs,
    downstream: &ResolvedRefs,
) -> (DriftDecision, Vec<Comparison>) {
    let sorted: BTreeMap<&String, &String> = upstream.iter().collect();

    let comparisons: Vec<Comparison> = sorted
        .into_iter()
        .map(|(name, value)| Comparison {
            name: name.clone(),
            upstream: value.clone(),
            downstream: downstream.get(name).cloned(),
        })
        .collect();

    let decision = if comparisons.iter().any(Comparison::is_drifted) {
        DriftDecision::NeedsRebuild
    } else {
        DriftDecision::NoActionNeeded
    };

    (decision, comparisons)
}
