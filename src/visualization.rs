//! 3D visualization of snake cube solutions using kiss3d.

use kiss3d::prelude::*;

use snake_cube::grid::{idx_to_coord, solution_to_grid};
use snake_cube::Solution;

/// Alternating warm and cool tones so neighbouring segments stand apart.
const PALETTE: [(f32, f32, f32); 8] = [
    (0.9, 0.2, 0.2),
    (0.2, 0.5, 1.0),
    (1.0, 0.8, 0.2),
    (0.2, 0.8, 0.4),
    (1.0, 0.5, 0.1),
    (0.6, 0.3, 0.9),
    (0.95, 0.4, 0.7),
    (0.2, 0.8, 0.8),
];

fn segment_color(segment_index: usize) -> Color {
    let (r, g, b) = PALETTE[segment_index % PALETTE.len()];
    Color::new(r, g, b, 1.0)
}

struct RenderedCube {
    node: SceneNode3d,
    /// Position when not exploded.
    base_position: Vec3,
    segment_index: usize,
}

/// Builds the 3D scene for a solution.
///
/// Solver cell (x, y, z) maps to world (X, Y, Z), shifted so the cube's
/// centre sits at the origin. Each cube belongs to the segment that reserved
/// its cell; the seed cell belongs to the first segment.
///
/// Returns the rendered cubes and each segment's centroid in solver
/// coordinates.
fn build_scene(
    scene: &mut SceneNode3d,
    solution: &Solution,
    side: usize,
) -> (Vec<RenderedCube>, Vec<Vec3>) {
    /// Slightly below 1.0 to leave visible gaps.
    const CUBE_SIZE: f32 = 0.9;
    const CELL_SPACING: f32 = 1.0;
    let center_offset = -(side as f32 - 1.0) / 2.0;

    let owners = solution_to_grid(solution, side);
    let segment_count = solution.segments().len();
    let mut sums = vec![Vec3::ZERO; segment_count];
    let mut counts = vec![0u32; segment_count];

    let mut rendered_cubes = Vec::new();
    for (cell_index, owner) in owners.iter().enumerate() {
        let Some(segment_index) = *owner else {
            continue;
        };
        let cell = idx_to_coord(side, cell_index);
        let solver_position = Vec3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        sums[segment_index] += solver_position;
        counts[segment_index] += 1;

        let base_position = solver_position * CELL_SPACING + Vec3::splat(center_offset);
        let node = scene
            .add_cube(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)
            .set_color(segment_color(segment_index))
            .set_position(base_position);
        rendered_cubes.push(RenderedCube {
            node,
            base_position,
            segment_index,
        });
    }

    let centroids = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| if count == 0 { sum } else { sum / count as f32 })
        .collect();

    (rendered_cubes, centroids)
}

/// Displays all solutions in an interactive 3D viewer.
pub fn display(side: usize, solutions: Vec<Solution>) {
    pollster::block_on(display_async(side, solutions));
}

fn window_title(index: usize, total: usize) -> String {
    format!(
        "Solution {}/{} - [Left/Right] navigate, [Up/Down] explode, [R] reset",
        index + 1,
        total
    )
}

async fn display_async(side: usize, solutions: Vec<Solution>) {
    if solutions.is_empty() {
        println!("No solutions to display");
        return;
    }

    let num_solutions = solutions.len();
    let mut current_solution_index = 0;

    let mut window = Window::new(&window_title(0, num_solutions)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(side as f32 * 3.0);

    let mut scene = SceneNode3d::empty();
    let light_distance = side as f32 * 2.0;
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::splat(light_distance));

    let grid_center = Vec3::splat((side as f32 - 1.0) / 2.0);
    let (mut rendered_cubes, mut centroids) =
        build_scene(&mut scene, &solutions[current_solution_index], side);

    // 0.0 is compact, larger values push segments apart
    let mut explosion_amount: f32 = 0.0;
    const EXPLOSION_SPEED: f32 = 0.05;
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Up => explosion_amount += EXPLOSION_SPEED,
                        Key::Down => {
                            explosion_amount = (explosion_amount - EXPLOSION_SPEED).max(0.0)
                        }
                        Key::R => explosion_amount = 0.0,
                        Key::Right => {
                            current_solution_index = (current_solution_index + 1) % num_solutions;
                            needs_rebuild = true;
                        }
                        Key::Left => {
                            current_solution_index = current_solution_index
                                .checked_sub(1)
                                .unwrap_or(num_solutions - 1);
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut cube in rendered_cubes.drain(..) {
                cube.node.remove();
            }
            (rendered_cubes, centroids) =
                build_scene(&mut scene, &solutions[current_solution_index], side);
            window.set_title(&window_title(current_solution_index, num_solutions));
            needs_rebuild = false;
        }

        for cube in &mut rendered_cubes {
            let direction = (centroids[cube.segment_index] - grid_center).normalize_or_zero();
            cube.node
                .set_position(cube.base_position + direction * explosion_amount * side as f32);
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
