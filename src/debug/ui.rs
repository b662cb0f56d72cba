// ./src/debug/ui.rs
use crate::debug::svg_export::export_sites_svg;
use crate::voronoi::{CoverageBound, Diagram, FidelityReport, Precision};
use bevy::prelude::*;
use bevy_egui::{
    EguiContexts,
    egui::{Slider, Window},
};

/// Das Diagramm als Bevy-Ressource.
#[derive(Resource, Deref, DerefMut)]
pub struct DiagramResource(pub Diagram);

/// Zustand des Kontrollfensters zwischen zwei Frames.
#[derive(Resource, Debug)]
pub struct ControlPanelState {
    pub export_path: String,
    pub status: Option<String>,
    pub fidelity: Option<FidelityReport>,
}

impl Default for ControlPanelState {
    fn default() -> Self {
        Self {
            export_path: "voronoi_sites.svg".to_string(),
            status: None,
            fidelity: None,
        }
    }
}

pub fn diagram_control_ui_system(
    mut contexts: EguiContexts,
    mut diagram: ResMut<DiagramResource>,
    mut panel: ResMut<ControlPanelState>,
) {
    Window::new("Voronoi-Steuerung")
        .default_width(300.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Diagramm");
            let canvas = diagram.canvas();
            ui.label(format!("Sites: {}", diagram.n_sites()));
            ui.label(format!("Zeichenfläche: {} x {}", canvas.width, canvas.height));
            ui.label(format!("Max. Distanz: {:.1}", diagram.max_distance()));

            ui.collapsing("Darstellung", |ui| {
                let mut precision = diagram.precision();
                if ui
                    .add(Slider::new(&mut precision, Precision::MIN..=128).text("Präzision"))
                    .changed()
                {
                    diagram.set_precision(precision);
                }

                let mut visible = diagram.markers().visible();
                if ui.checkbox(&mut visible, "Marker anzeigen").changed() {
                    diagram.markers_mut().set_visible(visible);
                }

                let mut coverage = diagram.coverage();
                ui.horizontal(|ui| {
                    ui.radio_value(&mut coverage, CoverageBound::MaxSide, "Längste Seite");
                    ui.radio_value(&mut coverage, CoverageBound::Diagonal, "Diagonale");
                });
                if coverage != diagram.coverage() {
                    diagram.set_coverage(coverage);
                }
            });

            ui.collapsing("Export & Prüfung", |ui| {
                ui.text_edit_singleline(&mut panel.export_path);
                if ui.button("SVG exportieren").clicked() {
                    panel.status = Some(match export_sites_svg(&panel.export_path, &diagram) {
                        Ok(()) => format!("Gespeichert: {}", panel.export_path),
                        Err(err) => {
                            warn!("SVG export failed: {}", err);
                            format!("Fehler: {err}")
                        }
                    });
                }

                if ui.button("Genauigkeit prüfen").clicked() {
                    match diagram.fidelity(1.0, 4) {
                        Ok(report) => panel.fidelity = Some(report),
                        Err(err) => panel.status = Some(format!("Fehler: {err}")),
                    }
                }
                if let Some(report) = panel.fidelity {
                    ui.label(format!(
                        "{} Pixel geprüft, {} nicht abgedeckt, {} abweichend ({:.2}%)",
                        report.sampled,
                        report.uncovered,
                        report.mismatched,
                        report.mismatch_ratio() * 100.0
                    ));
                }
                if let Some(status) = &panel.status {
                    ui.label(status.as_str());
                }
            });
        });
}
