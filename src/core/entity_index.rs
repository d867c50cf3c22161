//=========================================================================
// Entity Index
//=========================================================================
//
// Maps every pickable visual node to the logical entity it belongs to.
//
// Pickable geometry is often a child mesh of the logical thing (a door
// handle, a tripod leg). Instead of walking a parent chain at pick time,
// every node of an entity is registered up front and resolution is a
// single lookup.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::doors::DoorId;
use super::items::InstanceId;
use super::world::NodeId;

//=== Interactable ========================================================

/// Logical entity the player can focus and interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interactable {
    Pickup(InstanceId),
    Door(DoorId),
    Terminal,
}

//=== EntityIndex =========================================================

#[derive(Debug, Default)]
pub struct EntityIndex {
    by_node: HashMap<NodeId, Interactable>,
    by_entity: HashMap<Interactable, Vec<NodeId>>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `nodes` as parts of `entity`, replacing any previous
    /// owner of those nodes.
    pub fn register<I>(&mut self, entity: Interactable, nodes: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        for node in nodes {
            if let Some(previous) = self.by_node.insert(node, entity) {
                if previous != entity {
                    if let Some(list) = self.by_entity.get_mut(&previous) {
                        list.retain(|n| *n != node);
                    }
                }
            }
            let list = self.by_entity.entry(entity).or_default();
            if !list.contains(&node) {
                list.push(node);
            }
        }
    }

    /// Registers the visual of a placed item.
    pub fn register_placed(&mut self, id: InstanceId) {
        self.register(Interactable::Pickup(id), [NodeId::Placed(id)]);
    }

    /// Removes every node of `entity`.
    pub fn unregister(&mut self, entity: Interactable) {
        if let Some(nodes) = self.by_entity.remove(&entity) {
            for node in nodes {
                self.by_node.remove(&node);
            }
        }
    }

    /// Logical entity for a picked node.
    pub fn resolve(&self, node: NodeId) -> Option<Interactable> {
        self.by_node.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    /// Nodes registered for an entity.
    pub fn nodes(&self, entity: Interactable) -> &[NodeId] {
        self.by_entity.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
        self.by_entity.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DOOR: Interactable = Interactable::Door(DoorId(3));

    #[test]
    fn every_sub_mesh_resolves_to_its_entity() {
        let mut index = EntityIndex::new();
        index.register(DOOR, [NodeId::Scene(10), NodeId::Scene(11), NodeId::Scene(12)]);

        assert_eq!(index.resolve(NodeId::Scene(11)), Some(DOOR));
        assert_eq!(index.nodes(DOOR).len(), 3);
    }

    #[test]
    fn untagged_node_resolves_to_none() {
        let index = EntityIndex::new();
        assert_eq!(index.resolve(NodeId::Scene(1)), None);
    }

    #[test]
    fn unregister_removes_all_nodes() {
        let mut index = EntityIndex::new();
        index.register(DOOR, [NodeId::Scene(10), NodeId::Scene(11)]);
        index.register(Interactable::Terminal, [NodeId::Scene(20)]);

        index.unregister(DOOR);

        assert!(!index.contains(NodeId::Scene(10)));
        assert!(!index.contains(NodeId::Scene(11)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn re_registering_node_moves_it() {
        let mut index = EntityIndex::new();
        index.register(DOOR, [NodeId::Scene(10)]);
        index.register(Interactable::Terminal, [NodeId::Scene(10)]);

        assert_eq!(index.resolve(NodeId::Scene(10)), Some(Interactable::Terminal));
        assert!(index.nodes(DOOR).is_empty());
    }

    #[test]
    fn placed_items_register_their_visual() {
        let mut index = EntityIndex::new();
        let id = InstanceId(5);
        index.register_placed(id);

        assert_eq!(index.resolve(NodeId::Placed(id)), Some(Interactable::Pickup(id)));
        index.unregister(Interactable::Pickup(id));
        assert!(index.is_empty());
    }
}
