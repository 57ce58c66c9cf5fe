//! Three cubes painted through a toy backend.
//!
//! Press `P` to open the painter, `1`-`3` to point at a cube, left click to
//! select (Shift/Ctrl/Alt work as usual), and `Space` to paint the selection
//! with the next colour.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use bevy_section_painter::prelude::*;

/// Colours written by the painter, keyed by cube.
#[derive(Resource, Clone, Default)]
struct Painted(Arc<Mutex<HashMap<Entity, [RecolourData; SLOT_COUNT]>>>);

#[derive(Resource, Default)]
struct Cubes(Vec<Entity>);

/// The single paintable section of a cube.
struct CubeBody {
    object: Entity,
    appearance: String,
    painted: Painted,
}

impl RecolourCapability for CubeBody {
    fn section_name(&self) -> &str {
        "body"
    }

    fn kind(&self) -> SectionKind {
        SectionKind::Switchable
    }

    fn colours(&self) -> [RecolourData; SLOT_COUNT] {
        self.painted
            .0
            .lock()
            .ok()
            .and_then(|p| p.get(&self.object).copied())
            .unwrap_or_default()
    }

    fn set_colours(&mut self, colours: [RecolourData; SLOT_COUNT]) {
        if let Ok(mut painted) = self.painted.0.lock() {
            painted.insert(self.object, colours);
        }
    }

    fn current_appearance(&self) -> String {
        self.appearance.clone()
    }

    fn appearance_names(&self) -> Vec<String> {
        vec!["stock".to_string(), "painted".to_string()]
    }

    fn is_recolour_capable(&self, appearance: &str) -> bool {
        appearance == "painted"
    }

    fn set_appearance(&mut self, appearance: &str) {
        self.appearance = appearance.to_string();
    }
}

/// Every cube is a simple host, so no proxies are needed.
#[derive(Default)]
struct ToyBackend {
    painted: Painted,
}

impl PaintBackend for ToyBackend {
    fn object_name(&self, _object: Entity) -> String {
        "cube".to_string()
    }

    fn capabilities(&mut self, object: Entity) -> Vec<Box<dyn RecolourCapability>> {
        vec![Box::new(CubeBody {
            object,
            appearance: "stock".to_string(),
            painted: self.painted.clone(),
        })]
    }

    fn resolve_regions(
        &mut self,
        object: Entity,
        _capability: &dyn RecolourCapability,
    ) -> Result<Vec<RegionId>, RegionResolveError> {
        Ok(vec![RegionId(object.to_bits())])
    }

    fn set_stock_hit_testing(&mut self, _object: Entity, _enabled: bool) {}

    fn attach_proxy(&mut self, _object: Entity, _region: RegionId) -> Option<ProxyKey> {
        None
    }

    fn release_proxy(&mut self, _proxy: ProxyKey) {}
}

fn main() {
    let painted = Painted::default();
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SectionPainterPlugin::new())
        .insert_resource(PainterBackend::new(ToyBackend {
            painted: painted.clone(),
        }))
        .insert_resource(painted)
        .init_resource::<Cubes>()
        .add_systems(Startup, setup)
        .add_systems(Update, controls.before(SectionPainterSystems))
        .add_systems(Update, (sync_materials, log_highlights).after(SectionPainterSystems))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cubes: ResMut<Cubes>,
) {
    let mesh = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    for i in 0..3 {
        let cube = commands
            .spawn((
                PaintableObject,
                Mesh3d(mesh.clone()),
                MeshMaterial3d(materials.add(StandardMaterial::default())),
                Transform::from_xyz(i as f32 * 1.5 - 1.5, 0.5, 0.0),
            ))
            .id();
        cubes.0.push(cube);
    }

    commands.spawn((
        PointLight {
            intensity: 2000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, 6.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
    ));
}

/// Keyboard stand-in for a picking layer and a painter UI.
fn controls(
    keys: Res<ButtonInput<KeyCode>>,
    cubes: Res<Cubes>,
    mut hover: ResMut<PointerHover>,
    mut palette: ResMut<ColourPalette>,
    mut requests: MessageWriter<PainterRequest>,
    mut next_colour: Local<usize>,
) {
    const COLOURS: [LinearRgba; 3] = [LinearRgba::RED, LinearRgba::GREEN, LinearRgba::BLUE];

    if keys.just_pressed(KeyCode::KeyP) {
        requests.write(PainterRequest::Open);
    }

    for (i, key) in [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3]
        .into_iter()
        .enumerate()
    {
        if keys.just_pressed(key) {
            hover.object = cubes.0.get(i).copied();
        }
    }

    if keys.just_pressed(KeyCode::Space) {
        palette
            .editing_slot_mut()
            .set_colour(COLOURS[*next_colour % COLOURS.len()]);
        *next_colour += 1;
        requests.write(PainterRequest::SetRecolouring(true));
    }
}

fn sync_materials(
    painted: Res<Painted>,
    cubes: Query<(Entity, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok(painted) = painted.0.lock() else {
        return;
    };
    for (cube, material) in &cubes {
        let Some(colours) = painted.get(&cube) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = Color::from(colours[0].colour);
        }
    }
}

fn log_highlights(mut changes: MessageReader<HighlightChanged>) {
    for change in changes.read() {
        info!(
            "{:?} highlighted={} glowing={}",
            change.section.host, change.highlighted, change.glowing
        );
    }
}
