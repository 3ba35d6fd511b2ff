//! Static structure-priority tables.
//!
//! Both tables are read-only configuration: priority is expressed purely by
//! position in the slice, earliest first.

use warband_types::StructureType;

/// Order in which structures should be built (and repaired).
pub const BUILD_PRIORITIES: &[StructureType] = &[
    StructureType::Spawn,
    StructureType::Container,
    StructureType::Tower,
    StructureType::Extension,
    StructureType::Storage,
    StructureType::Terminal,
    StructureType::Link,
    StructureType::Extractor,
    StructureType::Lab,
    StructureType::Nuker,
    StructureType::Observer,
    StructureType::PowerSpawn,
    StructureType::Wall,
    StructureType::Rampart,
    StructureType::Road,
];

/// Order in which enemy structures should be attacked.
pub const ATTACK_STRUCTURE_PRIORITIES: &[StructureType] = &[
    StructureType::Spawn,
    StructureType::Tower,
    StructureType::Extension,
    StructureType::Link,
    StructureType::Lab,
    StructureType::Nuker,
    StructureType::Observer,
    StructureType::Extractor,
    StructureType::PowerSpawn,
    StructureType::Container,
    StructureType::Road,
    StructureType::Storage,
    StructureType::Terminal,
    StructureType::Rampart,
    StructureType::Wall,
];

/// Position of `structure_type` in `table`, if listed.
pub fn rank_in(table: &[StructureType], structure_type: StructureType) -> Option<usize> {
    table.iter().position(|t| *t == structure_type)
}
