use async_trait::async_trait;
use medqa_common::Category;

use crate::relation::{HopProbe, NodeProperty};
use crate::Result;

/// Read-only view of the medical knowledge graph.
#[async_trait]
pub trait GraphOracle: Send + Sync {
    /// True when the anchor node named `name` has at least one matching hop.
    async fn hop_exists(&self, name: &str, probe: &HopProbe) -> Result<bool>;

    /// Distinct names reached by the hop, sorted, at most `limit` of them.
    async fn hop_targets(&self, name: &str, probe: &HopProbe, limit: usize) -> Result<Vec<String>>;

    /// Property text for the node, or `None` when absent or blank.
    async fn node_property(
        &self,
        name: &str,
        category: Category,
        property: NodeProperty,
    ) -> Result<Option<String>>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
