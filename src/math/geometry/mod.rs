// src/math/geometry/mod.rs

pub mod mesh;

pub use self::mesh::DistanceFieldMesh;
