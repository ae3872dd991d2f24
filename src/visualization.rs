//! Interactive 3D cube painter using kiss3d.
//!
//! The keyboard drives a cursor over the 54 facelets in canonical order. Every
//! edit goes through the [`Session`], so the window only ever draws snapshots.

use kiss3d::prelude::*;

use cubepaint::facelets::{FaceletRecord, FACELETS_PER_FACE, FACELET_COUNT, FACELET_MAP};
use cubepaint::orchestrator::Phase;
use cubepaint::palette::{self, Sticker};
use cubepaint::{CubeState, Position, Session, Solver};

/// Size of each rendered cubelet body (slightly smaller than 1.0 for visible gaps).
const CUBE_SIZE: f32 = 0.95;
/// Spacing between cubelet centers.
const CELL_SPACING: f32 = 1.0;
/// Edge length of a sticker on a cubelet face.
const STICKER_SIZE: f32 = 0.82;
/// How far a sticker stands off its face.
const STICKER_THICKNESS: f32 = 0.04;
/// Edge length of the cursor marker.
const CURSOR_SIZE: f32 = 0.2;

fn to_render_color(sticker: Sticker) -> Color {
    let (r, g, b) = sticker.rgb();
    Color::new(r, g, b, 1.0)
}

/// World-space center of a cubelet.
fn cubelet_center(position: Position) -> Vec3 {
    Vec3::new(
        position.x() as f32 * CELL_SPACING,
        position.y() as f32 * CELL_SPACING,
        position.z() as f32 * CELL_SPACING,
    )
}

fn face_normal(record: &FaceletRecord) -> Vec3 {
    let (x, y, z) = record.face.normal();
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Builds the scene for a cube snapshot and returns every node added.
///
/// Each cubelet is a dark body with one thin plate per visible slot. The plate is
/// flattened along its face normal.
fn build_scene(scene: &mut SceneNode3d, state: &CubeState, cursor: usize) -> Vec<SceneNode3d> {
    let mut nodes = Vec::new();

    for (position, _) in state.iter() {
        let body = scene
            .add_cube(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)
            .set_color(to_render_color(Sticker::Internal))
            .set_position(cubelet_center(position));
        nodes.push(body);
    }

    for record in &FACELET_MAP {
        let Some(sticker) = state.sticker(record.position, record.face) else {
            continue;
        };
        let normal = face_normal(record);
        let extent = |axis: f32| {
            if axis != 0.0 {
                STICKER_THICKNESS
            } else {
                STICKER_SIZE
            }
        };
        let offset = (CUBE_SIZE + STICKER_THICKNESS) / 2.0;
        let plate = scene
            .add_cube(extent(normal.x), extent(normal.y), extent(normal.z))
            .set_color(to_render_color(sticker))
            .set_position(cubelet_center(record.position) + normal * offset);
        nodes.push(plate);
    }

    let selected = &FACELET_MAP[cursor];
    let marker = scene
        .add_cube(CURSOR_SIZE, CURSOR_SIZE, CURSOR_SIZE)
        .set_color(Color::new(1.0, 0.0, 1.0, 1.0))
        .set_position(
            cubelet_center(selected.position) + face_normal(selected) * (CUBE_SIZE / 2.0 + 0.2),
        );
    nodes.push(marker);

    nodes
}

/// Window title describing the cursor, brush, and last result.
fn title(cursor: usize, brush: palette::Color, status: &str) -> String {
    let record = &FACELET_MAP[cursor];
    format!(
        "{}{} ({} {}) - brush {} - {} - [arrows] move [C] color [Space] paint [S] solve [R] reset",
        record.letter,
        record.cell() + 1,
        record.position,
        record.face,
        brush,
        status,
    )
}

/// Opens the painter window and runs it until closed.
pub fn display<S: Solver>(session: Session<S>) {
    pollster::block_on(display_async(session));
}

async fn display_async<S: Solver>(session: Session<S>) {
    session.start().await;
    let mut status = match session.phase() {
        Phase::Faulted => "solver unavailable".to_owned(),
        _ => "ready".to_owned(),
    };

    let mut cursor = 0;
    let mut brush_index = 0;
    let mut brush = palette::Color::ALL[brush_index];

    let mut window = Window::new(&title(cursor, brush, &status)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(8.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 5.0));

    let mut nodes = build_scene(&mut scene, &session.snapshot(), cursor);
    // whether the scene needs to be rebuilt (after an edit or cursor move)
    let mut needs_rebuild = false;

    loop {
        let mut solve_requested = false;

        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Right => {
                            cursor = (cursor + 1) % FACELET_COUNT;
                            needs_rebuild = true;
                        }
                        Key::Left => {
                            cursor = cursor.checked_sub(1).unwrap_or(FACELET_COUNT - 1);
                            needs_rebuild = true;
                        }
                        Key::Down => {
                            cursor = (cursor + FACELETS_PER_FACE) % FACELET_COUNT;
                            needs_rebuild = true;
                        }
                        Key::Up => {
                            cursor = (cursor + FACELET_COUNT - FACELETS_PER_FACE) % FACELET_COUNT;
                            needs_rebuild = true;
                        }
                        Key::C => {
                            brush_index = (brush_index + 1) % palette::Color::ALL.len();
                            brush = palette::Color::ALL[brush_index];
                            needs_rebuild = true;
                        }
                        Key::Space => {
                            let record = &FACELET_MAP[cursor];
                            if session.notify_facelet_clicked(record.position, record.face, brush) {
                                status = "edited".to_owned();
                                needs_rebuild = true;
                            }
                        }
                        Key::R => {
                            session.notify_reset_requested();
                            status = "reset".to_owned();
                            needs_rebuild = true;
                        }
                        Key::S => solve_requested = true,
                        _ => {}
                    }
                }
            }
        }

        // CommandSolver blocks here, so the window freezes until the program exits
        if solve_requested {
            match session.notify_solve_requested().await {
                Some(Ok(outcome)) => {
                    println!("Solution: {outcome}");
                    status = outcome.to_string();
                }
                Some(Err(e)) => {
                    println!("Cannot solve: {e}");
                    status = e.to_string();
                }
                None => {}
            }
            needs_rebuild = true;
        }

        if needs_rebuild {
            for mut node in nodes.drain(..) {
                node.remove();
            }
            nodes = build_scene(&mut scene, &session.snapshot(), cursor);
            window.set_title(&title(cursor, brush, &status));
            needs_rebuild = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
