use bevy::prelude::*;
use constants::playback::{NORMAL_TIME_SCALE, PAUSED_TIME_SCALE, SLOW_MOTION_TIME_SCALE};

use crate::engine::core::viewer_state::ViewerToggles;

/// Playback speed for the given flags. Pause wins over slow motion.
pub fn time_scale(paused: bool, slow_mo: bool) -> f32 {
    if paused {
        PAUSED_TIME_SCALE
    } else if slow_mo {
        SLOW_MOTION_TIME_SCALE
    } else {
        NORMAL_TIME_SCALE
    }
}

/// Playback driver for the first clip of the displayed asset.
///
/// The mixer owns clip time. Bound players keep their own clock stopped and
/// are seeked to `elapsed` every tick.
#[derive(Debug, Clone)]
pub struct Mixer {
    graph: Handle<AnimationGraph>,
    clip: Handle<AnimationClip>,
    clip_node: AnimationNodeIndex,
    time_scale: f32,
    elapsed: f32,
}

impl Mixer {
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

/// Marks an `AnimationPlayer` driven by the current mixer.
#[derive(Component)]
pub struct MixerBound;

/// Holds the mixer of the displayed asset, if it has any clips.
#[derive(Resource, Default)]
pub struct AnimationController {
    mixer: Option<Mixer>,
}

impl AnimationController {
    /// Create a fresh mixer looping `clip`. The time-scale is taken from the
    /// current flags, never from defaults.
    pub fn bind(
        &mut self,
        graph: Handle<AnimationGraph>,
        clip: Handle<AnimationClip>,
        clip_node: AnimationNodeIndex,
        toggles: &ViewerToggles,
    ) {
        self.mixer = Some(Mixer {
            graph,
            clip,
            clip_node,
            time_scale: toggles.time_scale(),
            elapsed: 0.0,
        });
    }

    /// Drop the mixer, returning its graph so the asset can be released.
    pub fn clear(&mut self) -> Option<Handle<AnimationGraph>> {
        self.mixer.take().map(|mixer| mixer.graph)
    }

    pub fn mixer(&self) -> Option<&Mixer> {
        self.mixer.as_ref()
    }

    pub fn time_scale(&self) -> Option<f32> {
        self.mixer.as_ref().map(Mixer::time_scale)
    }

    /// Recompute the time-scale after a pause or slow-motion toggle.
    pub fn apply_toggles(&mut self, toggles: &ViewerToggles) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.time_scale = toggles.time_scale();
        }
    }

    /// Advance clip time by `delta` wall-clock seconds, looping over
    /// `duration` when it is known. Returns the scaled step.
    pub fn advance(&mut self, delta: f32, duration: Option<f32>) -> f32 {
        let Some(mixer) = self.mixer.as_mut() else {
            return 0.0;
        };
        let step = delta * mixer.time_scale;
        mixer.elapsed += step;
        if let Some(duration) = duration.filter(|duration| *duration > 0.0) {
            mixer.elapsed = mixer.elapsed.rem_euclid(duration);
        }
        step
    }

    /// Start looping playback of the mixer's clip on `player`.
    /// Returns the graph the player entity must reference.
    pub fn attach_player(&self, player: &mut AnimationPlayer) -> Option<Handle<AnimationGraph>> {
        let mixer = self.mixer.as_ref()?;
        player
            .play(mixer.clip_node)
            .repeat()
            .set_speed(0.0)
            .seek_to(mixer.elapsed);
        Some(mixer.graph.clone())
    }
}

/// Advance the mixer by the frame's elapsed time and seek bound players to it.
pub fn advance_animation(
    time: Res<Time>,
    clips: Res<Assets<AnimationClip>>,
    mut controller: ResMut<AnimationController>,
    mut players: Query<&mut AnimationPlayer, With<MixerBound>>,
) {
    let Some(mixer) = controller.mixer() else {
        return;
    };
    let duration = clips.get(&mixer.clip).map(AnimationClip::duration);
    controller.advance(time.delta_secs(), duration);

    let Some(mixer) = controller.mixer() else {
        return;
    };
    for mut player in &mut players {
        if let Some(active) = player.animation_mut(mixer.clip_node) {
            active.seek_to(mixer.elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn elapsed(controller: &AnimationController) -> f32 {
        controller.mixer().map(|mixer| mixer.elapsed).unwrap_or_default()
    }

    fn bound_controller(toggles: &ViewerToggles) -> AnimationController {
        let (_, node) = AnimationGraph::from_clip(Handle::default());
        let mut controller = AnimationController::default();
        controller.bind(Handle::default(), Handle::default(), node, toggles);
        controller
    }

    #[test]
    fn time_scale_table() {
        assert_eq!(time_scale(false, false), 1.0);
        assert_eq!(time_scale(false, true), 0.35);
        assert_eq!(time_scale(true, false), 0.0);
        assert_eq!(time_scale(true, true), 0.0);
    }

    #[test]
    fn bind_uses_current_flags() {
        let toggles = ViewerToggles {
            slow_mo: true,
            ..default()
        };
        let controller = bound_controller(&toggles);
        assert_eq!(controller.time_scale(), Some(0.35));
    }

    #[test]
    fn no_mixer_means_no_time_scale() {
        let mut controller = AnimationController::default();
        controller.apply_toggles(&ViewerToggles {
            paused: true,
            ..default()
        });
        assert_eq!(controller.time_scale(), None);
        assert_eq!(controller.advance(1.0, None), 0.0);
    }

    #[test]
    fn pause_twice_restores_previous_scale() {
        let mut toggles = ViewerToggles {
            slow_mo: true,
            ..default()
        };
        let mut controller = bound_controller(&toggles);
        let before = controller.time_scale();

        toggles.paused = true;
        controller.apply_toggles(&toggles);
        assert_eq!(controller.time_scale(), Some(0.0));

        toggles.paused = false;
        controller.apply_toggles(&toggles);
        assert_eq!(controller.time_scale(), before);
    }

    #[test]
    fn advance_scales_elapsed_time() {
        let mut toggles = ViewerToggles::default();
        let mut controller = bound_controller(&toggles);

        assert_eq!(controller.advance(0.5, None), 0.5);

        toggles.slow_mo = true;
        controller.apply_toggles(&toggles);
        let step = controller.advance(1.0, None);
        assert!((step - 0.35).abs() < 1e-6);

        toggles.paused = true;
        controller.apply_toggles(&toggles);
        assert_eq!(controller.advance(10.0, None), 0.0);

        assert!((elapsed(&controller) - 0.85).abs() < 1e-6);
    }

    #[test]
    fn advance_loops_over_the_clip_duration() {
        let mut controller = bound_controller(&ViewerToggles::default());
        controller.advance(2.5, Some(2.0));
        assert!((elapsed(&controller) - 0.5).abs() < 1e-6);

        // Unknown or zero-length clips keep accumulating.
        controller.advance(2.0, Some(0.0));
        assert!((elapsed(&controller) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn bound_players_follow_the_mixer_clock() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.init_resource::<Assets<AnimationClip>>();
        world.init_resource::<Assets<AnimationGraph>>();

        let mut clip = AnimationClip::default();
        clip.set_duration(4.0);
        let clip = world.resource_mut::<Assets<AnimationClip>>().add(clip);
        let (graph, node) = AnimationGraph::from_clip(clip.clone());
        let graph = world.resource_mut::<Assets<AnimationGraph>>().add(graph);

        let toggles = ViewerToggles {
            slow_mo: true,
            ..default()
        };
        let mut controller = AnimationController::default();
        controller.bind(graph, clip, node, &toggles);

        let mut player = AnimationPlayer::default();
        assert!(controller.attach_player(&mut player).is_some());
        world.insert_resource(controller);
        let entity = world.spawn((player, MixerBound)).id();

        for _ in 0..2 {
            world
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs(1));
            world
                .run_system_once(advance_animation)
                .expect("advance system runs");
        }

        let player = world.get::<AnimationPlayer>(entity).expect("player");
        let active = player.animation(node).expect("clip is playing");
        assert!((active.seek_time() - 0.7).abs() < 1e-5);
        assert_eq!(active.speed(), 0.0);
    }

    #[test]
    fn clear_hands_back_the_graph() {
        let mut controller = bound_controller(&ViewerToggles::default());
        assert!(controller.clear().is_some());
        assert!(controller.mixer().is_none());
        assert!(controller.clear().is_none());
    }
}
