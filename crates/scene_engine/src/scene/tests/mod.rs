//! Integration tests across the scene graph, traverser and cull contracts
