// ./src/main.rs
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_egui::EguiPlugin;

pub mod setup; // Kamera, Bild und Startszene

use dm_voronoi::debug::ui::{ControlPanelState, DiagramResource, diagram_control_ui_system};
use setup::{FrameImage, frame_extent, setup_scene};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(EguiPlugin)
        .init_resource::<ControlPanelState>()
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                // Block 1: UI und Fenstergröße verändern das Diagramm
                diagram_control_ui_system,
                handle_window_resize_system,
                // Block 2: rendern und ins Bild kopieren
                render_diagram_system,
            )
                .chain(),
        )
        .run();
}

/// Leitet Größenänderungen des Fensters an das Diagramm weiter.
fn handle_window_resize_system(
    mut events: EventReader<WindowResized>,
    mut diagram: ResMut<DiagramResource>,
) {
    // Nur die letzte Größe zählt
    if let Some(event) = events.read().last() {
        diagram
            .canvas_mut()
            .set_size(event.width as u32, event.height as u32);
        diagram.resize();
    }
}

fn render_diagram_system(
    mut diagram: ResMut<DiagramResource>,
    frame: Res<FrameImage>,
    mut images: ResMut<Assets<Image>>,
) {
    let canvas = diagram.canvas();
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }
    diagram.render();

    let Some(image) = images.get_mut(&frame.0) else {
        return;
    };
    let extent = frame_extent(canvas);
    if image.texture_descriptor.size != extent {
        image.resize(extent);
    }
    image.data = diagram.frame().to_rgba8_top_down();
}
