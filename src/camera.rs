//! Orbit camera, projection and the view/projection uniform.
//!
//! The camera orbits a fixed target point: drag rotates yaw/pitch, scroll
//! changes the orbit distance, and an auto-rotation advances the yaw a little
//! every frame. The uniform buffer bundle lives in [`CameraResources`] and is
//! rewritten once per frame by the event loop.

use cgmath::*;
use instant::Duration;
use winit::event::{MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_PITCH: Rad<f32> = Rad(std::f32::consts::FRAC_PI_2 - 0.05);

/// An orbiting camera described by its target, orbit distance, and two angles.
#[derive(Debug)]
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        target: impl Into<Point3<f32>>,
        distance: f32,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            target: target.into(),
            distance,
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// The eye position derived from the orbit parameters.
    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        self.target
            + self.distance
                * Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }
}

/// Perspective projection, kept separate from the camera so a window resize
/// only touches the aspect ratio.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera uniform as laid out for the shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbit controls: drag to rotate, scroll to zoom, auto-rotating by default.
#[derive(Debug)]
pub struct OrbitController {
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    sensitivity: f32,
    zoom_speed: f32,
    /// Continuous yaw drift per second.
    pub auto_rotate: Rad<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitController {
    pub fn new(sensitivity: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            sensitivity,
            zoom_speed,
            auto_rotate: Rad(0.3),
            min_distance: 10.0,
            max_distance: 60.0,
        }
    }

    /// Accumulate a mouse drag. The event loop routes raw mouse motion here
    /// while the rotate button is held.
    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            self.scroll += match delta {
                MouseScrollDelta::LineDelta(_, lines) => *lines,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
            };
        }
    }

    /// Apply pending input plus the auto-rotation to the camera.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * dt;
        camera.yaw += self.auto_rotate * dt;
        camera.pitch += Rad(-self.rotate_vertical) * self.sensitivity * dt;
        if camera.pitch < -SAFE_PITCH {
            camera.pitch = -SAFE_PITCH;
        } else if camera.pitch > SAFE_PITCH {
            camera.pitch = SAFE_PITCH;
        }

        camera.distance = (camera.distance - self.scroll * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);

        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
        self.scroll = 0.0;
    }
}

/// Camera GPU resources: the camera itself, its controller, and the uniform
/// buffer with bind group, owned by the context.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_looks_down_the_z_axis() {
        // yaw of 90 degrees puts the eye on +z, matching the initial scene.
        let camera = Camera::new((0.0, 0.0, 0.0), 25.0, Deg(90.0), Deg(0.0));
        let position = camera.position();
        assert!(position.x.abs() < 1e-4);
        assert!(position.y.abs() < 1e-4);
        assert!((position.z - 25.0).abs() < 1e-4);
    }

    #[test]
    fn auto_rotation_advances_yaw_without_input() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), 25.0, Deg(90.0), Deg(0.0));
        let mut controller = OrbitController::new(0.4, 2.0);
        let before = camera.yaw;
        controller.update(&mut camera, Duration::from_millis(500));
        assert!(camera.yaw > before);
        assert_eq!(camera.pitch, Rad(0.0));
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), 25.0, Deg(90.0), Deg(0.0));
        let mut controller = OrbitController::new(10.0, 2.0);
        controller.handle_mouse(0.0, -10_000.0);
        controller.update(&mut camera, Duration::from_secs(1));
        assert!(camera.pitch <= SAFE_PITCH);
    }

    #[test]
    fn zoom_is_clamped_to_the_orbit_range() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), 25.0, Deg(90.0), Deg(0.0));
        let mut controller = OrbitController::new(0.4, 2.0);
        controller.scroll = 1_000.0;
        controller.update(&mut camera, Duration::from_millis(16));
        assert_eq!(camera.distance, controller.min_distance);

        controller.scroll = -1_000.0;
        controller.update(&mut camera, Duration::from_millis(16));
        assert_eq!(camera.distance, controller.max_distance);
    }
}
