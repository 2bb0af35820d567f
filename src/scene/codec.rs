//! Scene serialization and deserialization
//!
//! Scenes are persisted as a JSON array of [`EntityRecord`]s.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use super::error::SceneError;
use super::factory::{EntityDesc, EntityFactory, EntityHandle};
use super::record::EntityRecord;

/// Converts live entities to records and back
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneCodec {
    /// Emit indented JSON instead of a single line
    pretty: bool,
}

impl SceneCodec {
    /// Create a codec that writes compact JSON
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Toggle indented output
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Capture the state of `entities`, in order.
    ///
    /// A parent is recorded by the name it answers to (its explicit name, or
    /// its model name when unnamed). A parent whose name is shared with
    /// another captured entity is given a unique explicit name so the link
    /// resolves to it on load.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if a handle is stale
    pub fn serialize<F: EntityFactory + ?Sized>(
        &self,
        entities: &[EntityHandle],
        source: &F,
    ) -> Result<Vec<EntityRecord>, SceneError> {
        let snapshots = entities
            .iter()
            .map(|&handle| source.snapshot(handle))
            .collect::<Result<Vec<_>, _>>()?;
        let mut records: Vec<EntityRecord> = snapshots
            .iter()
            .map(|snapshot| EntityRecord::from_snapshot(snapshot, None))
            .collect();

        for (index, snapshot) in snapshots.iter().enumerate() {
            let Some(parent) = snapshot.parent else {
                continue;
            };
            let name = match entities.iter().position(|&handle| handle == parent) {
                Some(parent_index) => Self::claim_name(&mut records, parent_index),
                None => source.snapshot(parent)?.display_name().to_string(),
            };
            records[index].parent = Some(name);
        }
        Ok(records)
    }

    /// Name `records[index]` answers to, naming it `model#n` first if
    /// another record answers to the same name
    fn claim_name(records: &mut [EntityRecord], index: usize) -> String {
        let current = records[index].display_name().to_string();
        let shared = records
            .iter()
            .enumerate()
            .any(|(other, record)| other != index && record.display_name() == current);
        if !shared {
            return current;
        }

        let mut suffix = index;
        let name = loop {
            let candidate = format!("{}#{suffix}", records[index].model);
            if !records.iter().any(|record| record.display_name() == candidate) {
                break candidate;
            }
            suffix += 1;
        };
        debug!("Naming `{current}` at {index} as `{name}` to keep its parent link");
        records[index].name = Some(name.clone());
        name
    }

    /// Encode records as JSON text
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Serialize`] if a record holds a non-finite
    /// vector, which JSON cannot represent
    pub fn to_json(&self, records: &[EntityRecord]) -> Result<String, SceneError> {
        if let Some(record) = records
            .iter()
            .find(|record| !record.position.is_finite() || !record.scale.is_finite())
        {
            return Err(SceneError::Serialize(format!(
                "`{}` has a non-finite transform",
                record.display_name()
            )));
        }
        let result = if self.pretty {
            serde_json::to_string_pretty(records)
        } else {
            serde_json::to_string(records)
        };
        result.map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Decode records from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] if the text is not a valid record array
    pub fn from_json(&self, json: &str) -> Result<Vec<EntityRecord>, SceneError> {
        serde_json::from_str(json).map_err(|e| SceneError::Parse(e.to_string()))
    }

    /// Serialize `entities` and write them to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is stale or the file cannot be written
    pub fn write<F: EntityFactory + ?Sized>(
        &self,
        entities: &[EntityHandle],
        source: &F,
        path: impl AsRef<Path>,
    ) -> Result<(), SceneError> {
        let records = self.serialize(entities, source)?;
        self.write_records(&records, path)
    }

    /// Write records to `path` as UTF-8 JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn write_records(
        &self,
        records: &[EntityRecord],
        path: impl AsRef<Path>,
    ) -> Result<(), SceneError> {
        let path = path.as_ref();
        let json = self.to_json(records)?;
        fs::write(path, json).map_err(|e| SceneError::io(path, e))?;
        info!("Wrote {} entities to {}", records.len(), path.display());
        Ok(())
    }

    /// Read records from a scene file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<EntityRecord>, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
        let records = self.from_json(&content)?;
        info!("Read {} entities from {}", records.len(), path.display());
        Ok(records)
    }

    /// Build entities from records, in order.
    ///
    /// Parent links are resolved once every entity exists: a record's parent
    /// is the first other record answering to that name. Names that match no
    /// record, and links that would form a cycle, are logged and left
    /// unlinked.
    ///
    /// Fails fast: on any error, entities created so far are destroyed.
    ///
    /// # Errors
    ///
    /// Returns the first record or factory error encountered
    pub fn deserialize<F: EntityFactory + ?Sized>(
        &self,
        records: &[EntityRecord],
        factory: &mut F,
    ) -> Result<Vec<EntityHandle>, SceneError> {
        let mut created = Vec::with_capacity(records.len());
        match Self::instantiate(records, factory, &mut created) {
            Ok(()) => Ok(created),
            Err(err) => {
                for handle in created.into_iter().rev() {
                    if let Err(cleanup) = factory.destroy(handle) {
                        warn!("Failed to roll back entity {handle}: {cleanup}");
                    }
                }
                Err(err)
            }
        }
    }

    fn instantiate<F: EntityFactory + ?Sized>(
        records: &[EntityRecord],
        factory: &mut F,
        created: &mut Vec<EntityHandle>,
    ) -> Result<(), SceneError> {
        for record in records {
            let handle = EntityDesc::from_record(record)?.spawn(factory)?;
            debug!("Rebuilt `{}` as entity {handle}", record.model);
            created.push(handle);
        }

        for (index, record) in records.iter().enumerate() {
            let Some(parent_name) = record.parent.as_deref() else {
                continue;
            };
            let parent_index = records
                .iter()
                .enumerate()
                .position(|(other, r)| other != index && r.display_name() == parent_name);
            let (Some(child), Some(parent)) = (
                created.get(index).copied(),
                parent_index.and_then(|i| created.get(i).copied()),
            ) else {
                warn!(
                    "Parent `{parent_name}` of `{}` not found in scene, leaving it unparented",
                    record.display_name()
                );
                continue;
            };
            match factory.set_parent(child, Some(parent)) {
                Ok(()) => {}
                Err(SceneError::ParentCycle { .. }) => warn!(
                    "Parent `{parent_name}` of `{}` would form a cycle, leaving it unparented",
                    record.display_name()
                ),
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use tempfile::tempdir;

    use super::*;
    use crate::core::Color;
    use crate::ecs::World;
    use crate::scene::{EntityKind, EntityRegistry};

    fn populated_world() -> (World, Vec<EntityHandle>) {
        let mut world = World::new();
        let ground = EntityDesc::model("plane")
            .named("ground")
            .scaled(DVec3::new(20.0, 1.0, 20.0))
            .colored(Color::GRAY)
            .textured("grass")
            .spawn(&mut world)
            .unwrap();
        let cube = EntityDesc::model("cube")
            .at(DVec3::new(0.0, 1.0, 0.0))
            .colored(Color::rgb(1.0, 0.9, 0.8))
            .with_physics()
            .spawn(&mut world)
            .unwrap();
        let light = EntityDesc::new(EntityKind::PointLight)
            .at(DVec3::new(2.0, 3.0, 2.0))
            .spawn(&mut world)
            .unwrap();
        world.set_parent(cube, Some(ground)).unwrap();
        (world, vec![ground, cube, light])
    }

    #[test]
    fn test_serialize_fields() {
        let (world, entities) = populated_world();
        let records = SceneCodec::new().serialize(&entities, &world).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].model, "plane");
        assert_eq!(records[0].name.as_deref(), Some("ground"));
        assert_eq!(records[0].texture.as_deref(), Some("grass"));
        assert_eq!(records[1].parent.as_deref(), Some("ground"));
        assert!(records[1].has_physics);
        assert_eq!(records[2].model, "PointLight");
        assert_eq!(records[2].parent, None);
    }

    #[test]
    fn test_round_trip_through_factory() {
        let (world, entities) = populated_world();
        let codec = SceneCodec::new();
        let records = codec.serialize(&entities, &world).unwrap();

        let mut rebuilt_world = World::new();
        let rebuilt = codec.deserialize(&records, &mut rebuilt_world).unwrap();
        assert_eq!(rebuilt.len(), entities.len());

        for (original, copy) in entities.iter().zip(&rebuilt) {
            let a = world.snapshot(*original).unwrap();
            let b = rebuilt_world.snapshot(*copy).unwrap();
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.position, b.position);
            assert_eq!(a.scale, b.scale);
            assert_eq!(a.color, b.color);
            assert_eq!(a.texture, b.texture);
            assert_eq!(a.has_physics, b.has_physics);
        }
        assert_eq!(rebuilt_world.parent(rebuilt[1]).unwrap(), Some(rebuilt[0]));
    }

    #[test]
    fn test_write_read_write_is_byte_identical() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");

        let (world, entities) = populated_world();
        let codec = SceneCodec::new();
        codec.write(&entities, &world, &first).unwrap();

        let records = codec.read(&first).unwrap();
        codec.write_records(&records, &second).unwrap();

        let a = std::fs::read(&first).unwrap();
        let b = std::fs::read(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_cube_scene_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.json");

        let mut world = World::new();
        let mut registry = EntityRegistry::new();
        registry.create_scene("main").unwrap();
        let cube = EntityDesc::model("cube").spawn(&mut world).unwrap();
        registry.add_to_scene("main", cube).unwrap();

        let codec = SceneCodec::new();
        codec
            .write(registry.active_entities(), &world, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"model\":\"cube\""));

        let records = codec.read(&path).unwrap();
        assert_eq!(records, vec![EntityRecord::generic("cube")]);
    }

    #[test]
    fn test_physics_flag_restored() {
        let mut record = EntityRecord::generic("barrel");
        record.has_physics = true;

        let mut world = World::new();
        let handles = SceneCodec::new().deserialize(&[record], &mut world).unwrap();
        assert!(world.has_physics(handles[0]).unwrap());
    }

    #[test]
    fn test_special_kinds_use_defaults() {
        let json = r##"[
            {"model":"EditorCamera","position":[0,5,-10],"scale":[1,1,1],"color":"#FFFFFFFF","texture":"None","parent":null,"has_physics":false},
            {"model":"FirstPersonController","position":[0,2,0],"scale":[1,1,1],"color":"#FFFFFFFF","texture":null,"parent":null,"has_physics":false}
        ]"##;
        let codec = SceneCodec::new();
        let records = codec.from_json(json).unwrap();

        let mut world = World::new();
        let handles = codec.deserialize(&records, &mut world).unwrap();
        let camera = world.snapshot(handles[0]).unwrap();
        assert_eq!(camera.kind, EntityKind::Camera);
        assert_eq!(camera.position, DVec3::new(0.0, 5.0, -10.0));
        assert_eq!(camera.texture, None);

        let player = world.snapshot(handles[1]).unwrap();
        assert_eq!(player.kind, EntityKind::FirstPersonController);
    }

    #[test]
    fn test_unknown_kind_rolls_back() {
        let records = vec![
            EntityRecord::generic("cube"),
            EntityRecord::generic("sphere"),
            EntityRecord::generic(""),
        ];

        let mut world = World::new();
        let result = SceneCodec::new().deserialize(&records, &mut world);
        assert!(matches!(result, Err(SceneError::UnknownEntityKind(_))));
        assert!(world.is_empty());
    }

    #[test]
    fn test_unresolved_parent_is_left_unlinked() {
        let mut record = EntityRecord::generic("lamp");
        record.parent = Some("table".to_string());

        let mut world = World::new();
        let handles = SceneCodec::new().deserialize(&[record], &mut world).unwrap();
        assert_eq!(world.parent(handles[0]).unwrap(), None);
    }

    #[test]
    fn test_parent_resolves_by_model_name() {
        let table = EntityRecord::generic("table");
        let mut lamp = EntityRecord::generic("lamp");
        lamp.parent = Some("table".to_string());

        let mut world = World::new();
        let handles = SceneCodec::new()
            .deserialize(&[lamp, table], &mut world)
            .unwrap();
        assert_eq!(world.parent(handles[0]).unwrap(), Some(handles[1]));
    }

    #[test]
    fn test_chain_of_unnamed_parents_survives_reload() {
        let mut world = World::new();
        let cubes: Vec<EntityHandle> = (0..3)
            .map(|_| EntityDesc::model("cube").spawn(&mut world).unwrap())
            .collect();
        world.set_parent(cubes[0], Some(cubes[1])).unwrap();
        world.set_parent(cubes[1], Some(cubes[2])).unwrap();

        let codec = SceneCodec::new();
        let records = codec.serialize(&cubes, &world).unwrap();
        assert_eq!(records[0].name, None);
        assert_eq!(records[0].parent, records[1].name);
        assert_eq!(records[1].parent, records[2].name);
        assert!(records.iter().all(|record| record.model == "cube"));

        let mut rebuilt_world = World::new();
        let rebuilt = codec.deserialize(&records, &mut rebuilt_world).unwrap();
        assert_eq!(rebuilt_world.parent(rebuilt[0]).unwrap(), Some(rebuilt[1]));
        assert_eq!(rebuilt_world.parent(rebuilt[1]).unwrap(), Some(rebuilt[2]));
        assert_eq!(rebuilt_world.parent(rebuilt[2]).unwrap(), None);
    }

    #[test]
    fn test_unique_parent_name_is_kept() {
        let mut world = World::new();
        let table = EntityDesc::model("table").spawn(&mut world).unwrap();
        let lamp = EntityDesc::model("lamp").spawn(&mut world).unwrap();
        world.set_parent(lamp, Some(table)).unwrap();

        let records = SceneCodec::new().serialize(&[table, lamp], &world).unwrap();
        assert_eq!(records[0].name, None);
        assert_eq!(records[1].parent.as_deref(), Some("table"));
    }

    #[test]
    fn test_cyclic_parent_names_are_left_unlinked() {
        let mut a = EntityRecord::generic("cube");
        a.name = Some("a".to_string());
        a.parent = Some("b".to_string());
        let mut b = EntityRecord::generic("cube");
        b.name = Some("b".to_string());
        b.parent = Some("a".to_string());

        let mut world = World::new();
        let handles = SceneCodec::new().deserialize(&[a, b], &mut world).unwrap();
        assert_eq!(world.parent(handles[0]).unwrap(), Some(handles[1]));
        assert_eq!(world.parent(handles[1]).unwrap(), None);
    }

    #[test]
    fn test_non_finite_record_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nan.json");
        let mut record = EntityRecord::generic("cube");
        record.position = DVec3::new(f64::NAN, 0.0, 0.0);

        let result = SceneCodec::new().write_records(&[record], &path);
        assert!(matches!(result, Err(SceneError::Serialize(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_errors() {
        let dir = tempdir().unwrap();
        let codec = SceneCodec::new();

        let missing = codec.read(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(SceneError::Io { .. })));

        let bad_color = dir.path().join("bad_color.json");
        std::fs::write(
            &bad_color,
            r##"[{"model":"cube","position":[0,0,0],"scale":[1,1,1],"color":"blue","texture":null,"parent":null,"has_physics":false}]"##,
        )
        .unwrap();
        assert!(matches!(codec.read(&bad_color), Err(SceneError::Parse(_))));

        let not_array = dir.path().join("object.json");
        std::fs::write(&not_array, "{}").unwrap();
        assert!(matches!(codec.read(&not_array), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("scene.json");
        let result = SceneCodec::new().write_records(&[], &path);
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let codec = SceneCodec::new().with_pretty(true);
        let records = vec![EntityRecord::generic("cube")];
        let json = codec.to_json(&records).unwrap();
        assert!(json.contains('\n'));
        assert_eq!(codec.from_json(&json).unwrap(), records);
    }
}
