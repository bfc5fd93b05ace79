use perch_geometry::{Camera, InnerSpace, Plane, Quat, Transform, Vec2, Vec3, wrap_angle};
use tracing::debug;

use crate::events::PointerId;

const MIN_BASELINE_DISTANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Drag,
    Pinch,
}

#[derive(Clone, Copy, Debug)]
enum GestureContext {
    Drag {
        pointer: PointerId,
        plane: Plane,
        offset: Vec3,
    },
    Pinch {
        pointers: [PointerId; 2],
        baseline_distance: f64,
        baseline_angle: f64,
        baseline_scale: f64,
        baseline_rotation: Quat,
    },
}

#[derive(Debug)]
pub struct GestureInterpreter {
    min_scale: f64,
    max_scale: f64,
    contacts: Vec<(PointerId, Vec2)>,
    context: Option<GestureContext>,
}

impl GestureInterpreter {
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            contacts: Vec::new(),
            context: None,
        }
    }

    pub fn mode(&self) -> GestureMode {
        match self.context {
            None => GestureMode::Idle,
            Some(GestureContext::Drag { .. }) => GestureMode::Drag,
            Some(GestureContext::Pinch { .. }) => GestureMode::Pinch,
        }
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn reset(&mut self) {
        self.contacts.clear();
        self.context = None;
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: Vec2,
        camera: &Camera,
        transform: &mut Transform,
    ) {
        match self.contacts.iter_mut().find(|(id, _)| *id == pointer) {
            Some(contact) => contact.1 = position,
            None => self.contacts.push((pointer, position)),
        }
        match self.contacts.len() {
            1 => self.begin_drag(camera, transform),
            2 => self.begin_pinch(transform),
            _ => {}
        }
    }

    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        position: Vec2,
        camera: &Camera,
        transform: &mut Transform,
    ) {
        let Some(contact) = self.contacts.iter_mut().find(|(id, _)| *id == pointer) else {
            return;
        };
        contact.1 = position;

        match self.context {
            Some(GestureContext::Drag {
                pointer: active,
                plane,
                offset,
            }) if active == pointer => {
                // Rays that miss the plane leave the object where it is.
                if let Some(hit) = camera
                    .screen_ray(position)
                    .and_then(|ray| plane.intersect(&ray))
                {
                    transform.translation = hit - offset;
                }
            }
            Some(GestureContext::Pinch {
                pointers,
                baseline_distance,
                baseline_angle,
                baseline_scale,
                baseline_rotation,
            }) if pointers.contains(&pointer) => {
                let (Some(a), Some(b)) = (self.position(pointers[0]), self.position(pointers[1]))
                else {
                    return;
                };
                let delta = b - a;
                if baseline_distance > MIN_BASELINE_DISTANCE {
                    let scale = baseline_scale * delta.magnitude() / baseline_distance;
                    transform.set_uniform_scale(scale.max(self.min_scale).min(self.max_scale));
                }
                let twist = wrap_angle(delta.y.atan2(delta.x) - baseline_angle);
                transform.rotation = Transform::yawed(baseline_rotation, twist);
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId, camera: &Camera, transform: &mut Transform) {
        let Some(index) = self.contacts.iter().position(|(id, _)| *id == pointer) else {
            return;
        };
        self.contacts.remove(index);

        let involved = match self.context {
            Some(GestureContext::Drag { pointer: active, .. }) => active == pointer,
            Some(GestureContext::Pinch { pointers, .. }) => pointers.contains(&pointer),
            None => true,
        };
        if !involved {
            return;
        }
        match self.contacts.len() {
            0 => {
                debug!("gesture ended");
                self.context = None;
            }
            1 => self.begin_drag(camera, transform),
            _ => self.begin_pinch(transform),
        }
    }

    fn position(&self, pointer: PointerId) -> Option<Vec2> {
        self.contacts
            .iter()
            .find(|(id, _)| *id == pointer)
            .map(|(_, position)| *position)
    }

    fn begin_drag(&mut self, camera: &Camera, transform: &Transform) {
        let Some(&(pointer, position)) = self.contacts.first() else {
            self.context = None;
            return;
        };
        let origin = transform.translation;
        self.context = Plane::new(origin, camera.forward()).and_then(|plane| {
            let hit = plane.intersect(&camera.screen_ray(position)?)?;
            Some(GestureContext::Drag {
                pointer,
                plane,
                offset: hit - origin,
            })
        });
        debug!(pointer = pointer.0, active = self.context.is_some(), "drag started");
    }

    fn begin_pinch(&mut self, transform: &Transform) {
        let (pointer_a, a) = self.contacts[0];
        let (pointer_b, b) = self.contacts[1];
        let delta = b - a;
        let baseline_distance = delta.magnitude();
        self.context = Some(GestureContext::Pinch {
            pointers: [pointer_a, pointer_b],
            baseline_distance,
            baseline_angle: delta.y.atan2(delta.x),
            baseline_scale: transform.uniform_scale(),
            baseline_rotation: transform.rotation,
        });
        debug!(baseline_distance, "pinch started");
    }
}
