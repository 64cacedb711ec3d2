// SPDX-License-Identifier: MPL-2.0
//! Interactive 3D viewport.
//!
//! Decoded scenes are flattened into a [`PreparedModel`] off the UI thread:
//! vertices centered on the bounding box and multiplied by the decoder
//! scale, one flat-shaded face per triangle. The canvas projects those faces
//! with a perspective camera and fills them back to front.
//!
//! Controls: left drag orbits, right drag pans, the wheel zooms.
//! Lighting is one ambient term plus one directional light.

use crate::app::config::{
    AMBIENT_LIGHT_INTENSITY, CAMERA_FOV_DEGREES, DEFAULT_CAMERA_DISTANCE,
    DIRECTIONAL_LIGHT_POSITION, MAX_CAMERA_DISTANCE, MIN_CAMERA_DISTANCE,
    ORBIT_RADIANS_PER_PIXEL, ZOOM_FACTOR_PER_LINE,
};
use crate::domain::preview::MountId;
use crate::scene::{DecodeError, Scene};
use crate::ui::design_tokens::palette;
use glam::{Mat4, Vec3, Vec4Swizzles};
use iced::widget::canvas::{self, Cache, Canvas, Geometry, Path};
use iced::widget::Action;
use iced::{mouse, Color, Element, Length, Point, Rectangle, Renderer, Size, Theme, Vector};
use std::cell::Cell;
use std::sync::Arc;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// Keeps the camera off the poles so `look_at` stays defined.
const MAX_PITCH: f32 = 1.5;

/// Pixel wheel deltas are converted to lines at this rate.
const PIXELS_PER_LINE: f32 = 50.0;

/// One flat-shaded triangle in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Face {
    vertices: [Vec3; 3],
    normal: Vec3,
    color: [f32; 4],
}

/// Scene geometry ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedModel {
    faces: Vec<Face>,
    radius: f32,
}

impl PreparedModel {
    /// Centers and scales `scene`, and computes a normal per face.
    pub fn prepare(scene: &Scene) -> Result<Self, DecodeError> {
        let bounds = scene.bounds().ok_or(DecodeError::Empty)?;
        let center = bounds.center();
        let scale = scene.scale;

        let mut faces = Vec::with_capacity(scene.triangle_count());
        for mesh in &scene.meshes {
            for triangle in &mesh.triangles {
                let vertices = triangle.map(|index| (mesh.positions[index as usize] - center) * scale);
                let [a, b, c] = vertices;
                faces.push(Face {
                    vertices,
                    normal: (b - a).cross(c - a).normalize_or_zero(),
                    color: mesh.material.base_color,
                });
            }
        }

        Ok(Self {
            faces,
            radius: bounds.size().length() * 0.5 * scale,
        })
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Bounding radius after scaling.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Opening camera: the default distance, pulled back for models that
    /// would not fit.
    #[must_use]
    pub fn initial_camera(&self) -> Camera {
        Camera::at_distance((self.radius * 2.0).max(DEFAULT_CAMERA_DISTANCE))
    }
}

/// Orbit camera around a movable target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::at_distance(DEFAULT_CAMERA_DISTANCE)
    }
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    #[must_use]
    pub fn at_distance(distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: distance.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE),
            target: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Rotates around the target by a cursor delta in pixels.
    pub fn orbit(&mut self, delta: Vector) {
        self.yaw -= delta.x * ORBIT_RADIANS_PER_PIXEL;
        self.pitch = (self.pitch + delta.y * ORBIT_RADIANS_PER_PIXEL).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Moves the target so the model follows the cursor.
    pub fn pan(&mut self, delta: Vector, viewport_height: f32) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let world_per_pixel = 2.0 * self.distance * (fov_radians() * 0.5).tan() / viewport_height.max(1.0);
        self.target += (up * delta.y - right * delta.x) * world_per_pixel;
    }

    /// Positive `lines` moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * ZOOM_FACTOR_PER_LINE.powf(lines))
            .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(fov_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }
}

fn fov_radians() -> f32 {
    CAMERA_FOV_DEGREES.to_radians()
}

/// A face in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProjectedFace {
    points: [Point; 3],
    depth: f32,
    color: Color,
}

/// Projects, shades and depth-sorts every face, farthest first. Faces
/// crossing the near plane are dropped.
fn project(model: &PreparedModel, camera: &Camera, size: Size) -> Vec<ProjectedFace> {
    let aspect = size.width / size.height.max(1.0);
    let view = camera.view();
    let view_projection = Camera::projection(aspect) * view;
    let light = Vec3::from(DIRECTIONAL_LIGHT_POSITION).normalize_or_zero();

    let to_screen = |ndc: Vec3| {
        Point::new(
            (ndc.x * 0.5 + 0.5) * size.width,
            (0.5 - ndc.y * 0.5) * size.height,
        )
    };

    let mut projected: Vec<ProjectedFace> = model
        .faces
        .iter()
        .filter_map(|face| {
            let mut points = [Point::ORIGIN; 3];
            for (point, vertex) in points.iter_mut().zip(face.vertices) {
                let clip = view_projection * vertex.extend(1.0);
                if clip.w <= NEAR_PLANE {
                    return None;
                }
                *point = to_screen(clip.xyz() / clip.w);
            }

            let centroid = (face.vertices[0] + face.vertices[1] + face.vertices[2]) / 3.0;
            let depth = -(view * centroid.extend(1.0)).z;

            // Two-sided: winding is not consistent across formats.
            let diffuse = face.normal.dot(light).abs();
            let intensity =
                (AMBIENT_LIGHT_INTENSITY + (1.0 - AMBIENT_LIGHT_INTENSITY) * diffuse).min(1.0);
            let [r, g, b, a] = face.color;

            Some(ProjectedFace {
                points,
                depth,
                color: Color::from_rgba(r * intensity, g * intensity, b * intensity, a),
            })
        })
        .collect();

    projected.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    projected
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Orbit,
    Pan,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    mode: DragMode,
    last: Point,
}

/// Widget-tree state of one viewport.
#[derive(Default)]
pub struct ViewState {
    mount: Option<MountId>,
    camera: Option<Camera>,
    drag: Option<Drag>,
    cache: Cache,
    /// What the cache was last drawn for.
    drawn: Cell<Option<(MountId, CameraKey, (u32, u32))>>,
}

/// Bit-exact camera snapshot used to detect stale cache contents.
type CameraKey = [u32; 6];

fn camera_key(camera: &Camera) -> CameraKey {
    [
        camera.yaw.to_bits(),
        camera.pitch.to_bits(),
        camera.distance.to_bits(),
        camera.target.x.to_bits(),
        camera.target.y.to_bits(),
        camera.target.z.to_bits(),
    ]
}

/// Canvas program for one mounted model.
pub struct ModelCanvas {
    model: Arc<PreparedModel>,
    mount: MountId,
}

impl ModelCanvas {
    #[must_use]
    pub fn new(model: Arc<PreparedModel>, mount: MountId) -> Self {
        Self { model, mount }
    }

    pub fn view<'a, Message: 'a>(self, height: f32) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fixed(height))
            .into()
    }

    fn camera(&self, state: &ViewState) -> Camera {
        match state.camera {
            Some(camera) if state.mount == Some(self.mount) => camera,
            _ => self.model.initial_camera(),
        }
    }
}

impl<Message> canvas::Program<Message> for ModelCanvas {
    type State = ViewState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        // The same widget slot can be reused by a later mount.
        if state.mount != Some(self.mount) {
            state.mount = Some(self.mount);
            state.camera = Some(self.model.initial_camera());
            state.drag = None;
        }
        let mut camera = self.camera(state);

        let iced::Event::Mouse(mouse_event) = event else {
            return None;
        };

        match mouse_event {
            mouse::Event::ButtonPressed(button) => {
                let position = cursor.position_over(bounds)?;
                let mode = match button {
                    mouse::Button::Left => DragMode::Orbit,
                    mouse::Button::Right => DragMode::Pan,
                    _ => return None,
                };
                state.drag = Some(Drag {
                    mode,
                    last: position,
                });
                Some(Action::capture())
            }
            mouse::Event::CursorMoved { position } => {
                let drag = state.drag.as_mut()?;
                let delta = *position - drag.last;
                drag.last = *position;
                match drag.mode {
                    DragMode::Orbit => camera.orbit(delta),
                    DragMode::Pan => camera.pan(delta, bounds.height),
                }
                state.camera = Some(camera);
                Some(Action::request_redraw().and_capture())
            }
            mouse::Event::ButtonReleased(_) | mouse::Event::CursorLeft => {
                state.drag.take().map(|_| Action::capture())
            }
            mouse::Event::WheelScrolled { delta } => {
                cursor.position_over(bounds)?;
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_LINE,
                };
                camera.zoom(lines);
                state.camera = Some(camera);
                Some(Action::request_redraw().and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let camera = self.camera(state);
        let key = (
            self.mount,
            camera_key(&camera),
            (bounds.width.to_bits(), bounds.height.to_bits()),
        );
        if state.drawn.get() != Some(key) {
            state.cache.clear();
            state.drawn.set(Some(key));
        }

        let geometry = state.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), palette::VIEWPORT);
            for face in project(&self.model, &camera, frame.size()) {
                let [a, b, c] = face.points;
                let path = Path::new(|builder| {
                    builder.move_to(a);
                    builder.line_to(b);
                    builder.line_to(c);
                    builder.close();
                });
                frame.fill(&path, face.color);
            }
        });

        vec![geometry]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match state.drag {
            Some(_) => mouse::Interaction::Grabbing,
            None if cursor.is_over(bounds) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}
