//! Mounting artwork panels into the selectable registry.
//!
//! Panels hang four to a wall, clockwise from the north wall. Each panel gets
//! an invisible pick box just in front of its canvas. Selecting a panel opens
//! the floating info panel, whose close button is registered as a second kind
//! of selectable while it is open.

use std::cell::RefCell;
use std::f32::consts::{FRAC_PI_2, PI};
use std::rc::{Rc, Weak};

use glam::{Affine3A, Quat, Vec3};
use log::{debug, info, warn};

use crate::catalog::Artwork;
use crate::config::GalleryConfig;
use crate::error::RegistryError;
use crate::math::Hitbox;
use crate::registry::{Payload, Registration, Registry};

/// Close button center in info-panel space
const CLOSE_BUTTON_OFFSET: Vec3 = Vec3::new(1.7, 1.3, 0.11);
const CLOSE_BUTTON_SIZE: Vec3 = Vec3::new(0.3, 0.3, 0.02);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    North,
    East,
    South,
    West,
    /// Overflow panels beyond four walls stand in the middle of the room
    Center,
}

/// Where a panel (or info panel) hangs: a position and a turn around +Y.
/// Zero yaw faces +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mount {
    pub wall: Wall,
    pub position: Vec3,
    pub yaw: f32,
}

impl Mount {
    pub fn transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(Quat::from_rotation_y(self.yaw), self.position)
    }

    /// Unit vector the panel faces
    pub fn facing(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::Z
    }
}

/// Mount point of the `index`-th artwork
pub fn wall_slot(index: usize, config: &GalleryConfig) -> Mount {
    let per_wall = config.panels_per_wall.max(1);
    let half = config.room_size / 2.0;
    let spacing = config.spacing();
    let along = spacing + (index % per_wall) as f32 * spacing;
    let y = config.panel_height;
    let inset = config.wall_inset;

    let (wall, position, yaw) = match index / per_wall {
        0 => (Wall::North, Vec3::new(-half + along, y, -half + inset), 0.0),
        1 => (Wall::East, Vec3::new(half - inset, y, -half + along), -FRAC_PI_2),
        2 => (Wall::South, Vec3::new(half - along, y, half - inset), PI),
        3 => (Wall::West, Vec3::new(-half + inset, y, half - along), FRAC_PI_2),
        _ => (Wall::Center, Vec3::new(0.0, y, 0.0), 0.0),
    };

    Mount { wall, position, yaw }
}

/// Pick box of a mounted panel
pub fn panel_hitbox(mount: &Mount, config: &GalleryConfig) -> Hitbox {
    let offset = Affine3A::from_translation(Vec3::new(0.0, 0.0, config.hitbox_offset));
    Hitbox::oriented(mount.transform() * offset, config.hitbox_size())
}

/// Info panel placement: in front of the artwork toward the room center, facing it
pub fn info_panel_mount(artwork_position: Vec3, config: &GalleryConfig) -> Mount {
    let to_center = Vec3::new(-artwork_position.x, 0.0, -artwork_position.z);
    let direction = to_center.try_normalize().unwrap_or(Vec3::Z);
    let position = Vec3::new(
        artwork_position.x + direction.x * config.info_panel_distance,
        artwork_position.y - config.info_panel_drop,
        artwork_position.z + direction.z * config.info_panel_distance,
    );

    Mount {
        wall: Wall::Center,
        position,
        yaw: direction.x.atan2(direction.z),
    }
}

/// Pick box of the close button in the info panel's top-right corner
pub fn close_button_hitbox(info_panel: &Mount) -> Hitbox {
    Hitbox::oriented(
        info_panel.transform() * Affine3A::from_translation(CLOSE_BUTTON_OFFSET),
        CLOSE_BUTTON_SIZE,
    )
}

/// Currently opened artwork
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    pub artwork: Rc<Artwork>,
    /// Mount position of the selected panel
    pub position: Vec3,
    pub info_panel: Mount,
}

#[derive(Debug)]
struct InfoPanel {
    registry: Registry,
    config: GalleryConfig,
    selected: Option<Selected>,
    close_button: Option<Registration>,
}

fn open(state: &Rc<RefCell<InfoPanel>>, artwork: Rc<Artwork>, position: Vec3) {
    let weak = Rc::downgrade(state);
    let mut panel = state.borrow_mut();
    let info_panel = info_panel_mount(position, &panel.config);

    let id = panel.registry.allocate_id();
    let registered = panel.registry.register(
        id,
        close_button_hitbox(&info_panel),
        Payload::close_panel(move || close_weak(&weak)),
    );
    debug_assert!(registered.is_ok(), "freshly allocated close button id {} was rejected", id);
    let button = match registered {
        Ok(button) => Some(button),
        Err(err) => {
            warn!("Info panel opened without a close button: {}", err);
            None
        }
    };

    info!("Opened info panel for {:?}", artwork.title);
    panel.selected = Some(Selected {
        artwork,
        position,
        info_panel,
    });
    let previous = std::mem::replace(&mut panel.close_button, button);
    drop(panel);
    // Unregisters the previous close button outside the borrow
    drop(previous);
}

fn close(state: &Rc<RefCell<InfoPanel>>) {
    let button = {
        let mut panel = state.borrow_mut();
        if let Some(selected) = panel.selected.take() {
            info!("Closed info panel for {:?}", selected.artwork.title);
        }
        panel.close_button.take()
    };
    drop(button);
}

fn close_weak(state: &Weak<RefCell<InfoPanel>>) {
    if let Some(state) = state.upgrade() {
        close(&state);
    }
}

/// Artwork panels mounted into a registry. Dropping it unmounts everything.
#[derive(Debug)]
pub struct Gallery {
    panels: Vec<(Mount, Registration)>,
    info: Rc<RefCell<InfoPanel>>,
}

impl Gallery {
    /// Registers one pick box per artwork
    pub fn mount(registry: &Registry, config: GalleryConfig, artworks: &[Artwork]) -> Result<Self, RegistryError> {
        let info = Rc::new(RefCell::new(InfoPanel {
            registry: registry.clone(),
            config: config.clone(),
            selected: None,
            close_button: None,
        }));

        let panels = artworks
            .iter()
            .enumerate()
            .map(|(index, artwork)| {
                let mount = wall_slot(index, &config);
                let artwork = Rc::new(artwork.clone());
                let on_select = {
                    let info = Rc::downgrade(&info);
                    let artwork = artwork.clone();
                    let position = mount.position;
                    move || {
                        if let Some(info) = info.upgrade() {
                            open(&info, artwork.clone(), position);
                        }
                    }
                };
                debug!("Mounting {:?} on {:?} wall", artwork.title, mount.wall);
                let registration = registry.register(
                    registry.allocate_id(),
                    panel_hitbox(&mount, &config),
                    Payload::artwork_panel(Some(artwork), Some(mount.position), on_select),
                )?;
                Ok((mount, registration))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        info!("Mounted {} artwork panels", panels.len());
        Ok(Self { panels, info })
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn mounts(&self) -> impl Iterator<Item = &Mount> + '_ {
        self.panels.iter().map(|(mount, _)| mount)
    }

    pub fn selected(&self) -> Option<Selected> {
        self.info.borrow().selected.clone()
    }

    /// Opens the info panel as if the `index`-th panel had been selected
    pub fn select(&self, index: usize) -> bool {
        let Some((mount, registration)) = self.panels.get(index) else {
            return false;
        };
        let artwork = self
            .info
            .borrow()
            .registry
            .list()
            .find(registration.id())
            .and_then(|entry| entry.payload().artwork().cloned());
        match artwork {
            Some(artwork) => {
                open(&self.info, artwork, mount.position);
                true
            }
            None => false,
        }
    }

    pub fn close(&self) {
        close(&self.info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GalleryConfig {
        GalleryConfig::default()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn four_slots_per_wall_in_clockwise_order() {
        let config = config();
        assert!(approx(wall_slot(0, &config).position, Vec3::new(-6.0, 5.0, -9.7)));
        assert!(approx(wall_slot(3, &config).position, Vec3::new(6.0, 5.0, -9.7)));
        assert!(approx(wall_slot(4, &config).position, Vec3::new(9.7, 5.0, -6.0)));
        assert!(approx(wall_slot(8, &config).position, Vec3::new(6.0, 5.0, 9.7)));
        assert!(approx(wall_slot(12, &config).position, Vec3::new(-9.7, 5.0, 6.0)));
        assert_eq!(wall_slot(16, &config).wall, Wall::Center);
    }

    #[test]
    fn every_wall_panel_faces_the_room() {
        let config = config();
        for index in 0..16 {
            let mount = wall_slot(index, &config);
            let toward_center = Vec3::new(-mount.position.x, 0.0, -mount.position.z).normalize();
            assert!(
                mount.facing().dot(toward_center) > 0.5,
                "slot {} on {:?} faces away",
                index,
                mount.wall
            );
        }
    }

    #[test]
    fn hitbox_sits_in_front_of_panel() {
        let config = config();
        let mount = wall_slot(4, &config);
        let bounds = panel_hitbox(&mount, &config).bounds();
        // East wall panel: pushed 0.11 toward -X, 0.1 deep
        assert!((bounds.center().x - (9.7 - 0.11)).abs() < 1e-4);
        assert!((bounds.size().x - 0.1).abs() < 1e-4);
        assert!((bounds.size().z - 2.0).abs() < 1e-4);
        assert!((bounds.size().y - 2.6).abs() < 1e-4);
    }

    #[test]
    fn info_panel_floats_toward_center() {
        let config = config();
        let mount = info_panel_mount(Vec3::new(0.0, 5.0, -9.7), &config);
        assert!(approx(mount.position, Vec3::new(0.0, 4.5, -6.7)));
        assert!(approx(mount.facing(), Vec3::Z));
    }

    #[test]
    fn opening_registers_a_live_close_button() {
        let registry = Registry::new();
        let artworks = crate::catalog::bundled().unwrap();
        let gallery = Gallery::mount(&registry, config(), &artworks[..2]).unwrap();

        assert!(gallery.select(1));
        let snapshot = registry.list();
        let buttons: Vec<_> = snapshot
            .iter()
            .filter(|entry| matches!(entry.payload(), Payload::ClosePanel { .. }))
            .collect();
        assert_eq!(buttons.len(), 1);
        assert!(buttons[0].is_alive());
        assert_eq!(
            *buttons[0].hitbox(),
            close_button_hitbox(&gallery.selected().unwrap().info_panel)
        );

        (buttons[0].payload().on_select())();
        assert!(gallery.selected().is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn info_panel_for_centered_artwork_has_fallback_direction() {
        let mount = info_panel_mount(Vec3::new(0.0, 5.0, 0.0), &config());
        assert!(mount.position.is_finite());
        assert!(approx(mount.position, Vec3::new(0.0, 4.5, 3.0)));
    }
}
