// ./src/setup.rs
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use dm_voronoi::debug::ui::DiagramResource;
use dm_voronoi::prelude::*;

const START_SIZE: (u32, u32) = (500, 500);

/// Bild, in das jeder gerenderte Frame des Diagramms kopiert wird.
#[derive(Resource)]
pub struct FrameImage(pub Handle<Image>);

pub fn frame_extent(canvas: Canvas) -> Extent3d {
    Extent3d {
        width: canvas.width.max(1),
        height: canvas.height.max(1),
        depth_or_array_layers: 1,
    }
}

pub fn setup_scene(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (width, height) = windows
        .get_single()
        .map(|window| (window.width() as u32, window.height() as u32))
        .unwrap_or(START_SIZE);

    let mut diagram = Diagram::new(
        DiagramOptions::new()
            .with_size(width, height)
            .with_precision(32),
    );

    // Startszene relativ zur Fenstergröße
    let (w, h) = (width as f32, height as f32);
    diagram.point(0.2 * w, 0.25 * h, "maroon");
    diagram.point(0.8 * w, 0.3 * h, "teal");
    diagram.point(0.5 * w, 0.8 * h, "orange");
    diagram.point(0.3 * w, 0.6 * h, "#6a5acd");
    diagram.line((0.55 * w, 0.35 * h), (0.7 * w, 0.65 * h), "olive");

    let image = Image::new_fill(
        frame_extent(diagram.canvas()),
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    let handle = images.add(image);

    // Kamera
    commands.spawn(Camera2dBundle::default());

    commands.spawn(SpriteBundle {
        texture: handle.clone(),
        ..default()
    });

    info!(
        "Scene set up with {} sites on a {}x{} canvas.",
        diagram.n_sites(),
        width,
        height
    );
    commands.insert_resource(DiagramResource(diagram));
    commands.insert_resource(FrameImage(handle));
}
