use bevy::prelude::*;
use bevy::render::mesh::morph::MorphWeights;
use bevy::ui::RelativeCursorPosition;
use constants::layout::{
    MORPH_MAX, MORPH_MIN, MORPH_PANEL_WIDTH, MORPH_SLIDER_HEIGHT, MORPH_SLIDER_WIDTH, MORPH_STEP,
};

use super::state::BlocksOrbit;
use super::{BUTTON_IDLE, BUTTON_SELECTED, TEXT_COLOUR};
use crate::engine::scene::lifecycle::{AssetLoadedEvent, ModelReadyEvent, SceneLifecycle};

// Components
#[derive(Component)]
pub struct MorphPanel;
#[derive(Component)]
pub struct MorphGroupNode;

/// Slider track bound to weight `index` of the `MorphWeights` on `target`.
#[derive(Component, Debug, Clone, Copy)]
pub struct MorphSlider {
    pub target: Entity,
    pub index: usize,
}
#[derive(Component)]
pub struct MorphSliderFill(pub MorphSlider);
#[derive(Component)]
pub struct MorphValueLabel(pub MorphSlider);

/// Clamp to the slider range and snap to its step.
pub fn quantize(value: f32) -> f32 {
    let clamped = value.clamp(MORPH_MIN, MORPH_MAX);
    ((clamped - MORPH_MIN) / MORPH_STEP).round() * MORPH_STEP + MORPH_MIN
}

/// One morph-capable entity of the displayed node.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTargetSource {
    pub entity: Entity,
    pub title: String,
    pub target_names: Vec<String>,
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MorphSliderSpec {
    pub index: usize,
    pub label: String,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MorphGroupSpec {
    pub title: String,
    pub target: Entity,
    pub sliders: Vec<MorphSliderSpec>,
}

/// Controls to build for a node: one group per source, one slider per target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphControlSet {
    pub groups: Vec<MorphGroupSpec>,
}

impl MorphControlSet {
    pub fn build(sources: &[MorphTargetSource]) -> Self {
        let groups = sources
            .iter()
            .filter(|source| !source.weights.is_empty())
            .map(|source| MorphGroupSpec {
                title: source.title.clone(),
                target: source.entity,
                sliders: source
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(index, weight)| MorphSliderSpec {
                        index,
                        label: source
                            .target_names
                            .get(index)
                            .cloned()
                            .unwrap_or_else(|| format!("target {index}")),
                        value: quantize(*weight),
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Every entity below `root` with non-empty morph weights, in hierarchy order.
pub fn collect_morph_sources(
    root: Entity,
    children: &Query<&Children>,
    morphs: &Query<(Option<&Name>, &MorphWeights)>,
    meshes: &Assets<Mesh>,
) -> Vec<MorphTargetSource> {
    std::iter::once(root)
        .chain(children.iter_descendants(root))
        .filter_map(|entity| {
            let (name, weights) = morphs.get(entity).ok()?;
            (!weights.weights().is_empty()).then_some((entity, name, weights))
        })
        .enumerate()
        .map(|(position, (entity, name, weights))| MorphTargetSource {
            entity,
            title: name
                .map(|name| name.as_str().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| format!("mesh #{position}")),
            target_names: weights
                .first_mesh()
                .and_then(|mesh| meshes.get(mesh))
                .and_then(Mesh::morph_target_names)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            weights: weights.weights().to_vec(),
        })
        .collect()
}

pub fn spawn_morph_panel(mut commands: Commands) {
    commands.spawn((
        MorphPanel,
        BlocksOrbit,
        RelativeCursorPosition::default(),
        Name::new("MorphPanel"),
        BackgroundColor(Color::srgba(0.10, 0.11, 0.13, 0.9)),
        Node {
            width: Val::Px(MORPH_PANEL_WIDTH),
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            max_height: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(8.0)),
            row_gap: Val::Px(6.0),
            display: Display::None,
            flex_direction: FlexDirection::Column,
            overflow: Overflow::clip_y(),
            ..default()
        },
    ));
}

/// Destroy the previous asset's controls as soon as a new asset is attached.
pub fn clear_morph_controls(
    mut loaded_events: EventReader<AssetLoadedEvent>,
    mut commands: Commands,
    mut panels: Query<(Entity, &mut Node), With<MorphPanel>>,
) {
    if loaded_events.read().count() == 0 {
        return;
    }

    for (panel, mut node) in &mut panels {
        commands.entity(panel).despawn_related::<Children>();
        node.display = Display::None;
    }
}

/// Build fresh controls once the current node's scene is instantiated.
pub fn rebuild_morph_controls(
    mut ready_events: EventReader<ModelReadyEvent>,
    mut commands: Commands,
    lifecycle: Res<SceneLifecycle>,
    children: Query<&Children>,
    morphs: Query<(Option<&Name>, &MorphWeights)>,
    meshes: Res<Assets<Mesh>>,
    mut panels: Query<(Entity, &mut Node), With<MorphPanel>>,
) {
    let Some(root) = ready_events
        .read()
        .map(|event| event.root)
        .filter(|root| lifecycle.current_root() == Some(*root))
        .last()
    else {
        return;
    };
    let Ok((panel, mut panel_node)) = panels.single_mut() else {
        return;
    };

    let sources = collect_morph_sources(root, &children, &morphs, &meshes);
    let controls = MorphControlSet::build(&sources);

    commands.entity(panel).despawn_related::<Children>();
    panel_node.display = if controls.is_empty() {
        Display::None
    } else {
        Display::Flex
    };
    if controls.is_empty() {
        return;
    }

    info!("Built morph controls for {} mesh(es)", controls.group_count());
    commands.entity(panel).with_children(|panel| {
        panel.spawn((
            Text::new("Morphs"),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(TEXT_COLOUR),
        ));

        for group in &controls.groups {
            panel
                .spawn((
                    MorphGroupNode,
                    Name::new(format!("MorphGroup {}", group.title)),
                    Node {
                        display: Display::Flex,
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        ..default()
                    },
                ))
                .with_children(|group_node| {
                    group_node.spawn((
                        Text::new(group.title.clone()),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOUR),
                    ));
                    for slider in &group.sliders {
                        spawn_slider_row(group_node, group.target, slider);
                    }
                });
        }
    });
}

fn spawn_slider_row(parent: &mut ChildSpawnerCommands, target: Entity, spec: &MorphSliderSpec) {
    let binding = MorphSlider {
        target,
        index: spec.index,
    };

    parent
        .spawn(Node {
            display: Display::Flex,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            column_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(spec.label.clone()),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(TEXT_COLOUR),
                Node {
                    flex_grow: 1.0,
                    ..default()
                },
            ));

            row.spawn((
                binding,
                Button,
                RelativeCursorPosition::default(),
                BackgroundColor(BUTTON_IDLE),
                Node {
                    width: Val::Px(MORPH_SLIDER_WIDTH),
                    height: Val::Px(MORPH_SLIDER_HEIGHT),
                    ..default()
                },
            ))
            .with_children(|track| {
                track.spawn((
                    MorphSliderFill(binding),
                    BackgroundColor(BUTTON_SELECTED),
                    Node {
                        width: Val::Percent(spec.value * 100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                ));
            });

            row.spawn((
                MorphValueLabel(binding),
                Text::new(format!("{:.2}", spec.value)),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(TEXT_COLOUR),
            ));
        });
}

/// Pressing or dragging on a track sets the weight from the cursor position.
pub fn morph_slider_interaction(
    sliders: Query<(&Interaction, &RelativeCursorPosition, &MorphSlider)>,
    mut weights: Query<&mut MorphWeights>,
) {
    for (interaction, cursor, slider) in &sliders {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let Some(normalized) = cursor.normalized else {
            continue;
        };
        let Ok(mut morph) = weights.get_mut(slider.target) else {
            continue;
        };

        // Normalised cursor position is centre-origin
        let value = quantize(normalized.x + 0.5);
        if let Some(weight) = morph.weights_mut().get_mut(slider.index) {
            if *weight != value {
                *weight = value;
            }
        }
    }
}

/// Keep fills and value labels on the live weights.
pub fn reflect_morph_sliders(
    weights: Query<&MorphWeights>,
    mut fills: Query<(&MorphSliderFill, &mut Node)>,
    mut labels: Query<(&MorphValueLabel, &mut Text)>,
) {
    let value_of = |slider: &MorphSlider| {
        weights
            .get(slider.target)
            .ok()
            .and_then(|morph| morph.weights().get(slider.index).copied())
            .map(quantize)
    };

    for (fill, mut node) in &mut fills {
        if let Some(value) = value_of(&fill.0) {
            let width = Val::Percent(value * 100.0);
            if node.width != width {
                node.width = width;
            }
        }
    }
    for (label, mut text) in &mut labels {
        if let Some(value) = value_of(&label.0) {
            let formatted = format!("{value:.2}");
            if text.0 != formatted {
                text.0 = formatted;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn source(entity: Entity, title: &str, weights: Vec<f32>) -> MorphTargetSource {
        MorphTargetSource {
            entity,
            title: title.to_string(),
            target_names: vec!["smile".to_string()],
            weights,
        }
    }

    #[test]
    fn quantize_clamps_and_snaps() {
        assert_eq!(quantize(-0.3), 0.0);
        assert_eq!(quantize(1.7), 1.0);
        assert!((quantize(0.456) - 0.46).abs() < 1e-6);
        assert!((quantize(0.454) - 0.45).abs() < 1e-6);
    }

    #[test]
    fn one_group_per_morph_mesh() {
        let mut world = World::new();
        let face = world.spawn_empty().id();
        let body = world.spawn_empty().id();
        let empty = world.spawn_empty().id();

        let controls = MorphControlSet::build(&[
            source(face, "Face", vec![0.0, 0.5]),
            source(empty, "Prop", Vec::new()),
            source(body, "Body", vec![1.0]),
        ]);

        assert_eq!(controls.group_count(), 2);
        let face_group = &controls.groups[0];
        assert_eq!(face_group.target, face);
        assert_eq!(face_group.sliders[0].label, "smile");
        assert_eq!(face_group.sliders[1].label, "target 1");
        assert_eq!(face_group.sliders[1].value, 0.5);
    }

    #[test]
    fn no_morph_meshes_means_an_empty_panel() {
        assert!(MorphControlSet::build(&[]).is_empty());
    }

    #[test]
    fn sources_are_collected_from_the_subtree() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();

        let weights = |values: Vec<f32>| MorphWeights::new(values, None).expect("morph weights");
        let root = world
            .spawn((
                Name::new("root"),
                children![
                    (Name::new("Face"), weights(vec![0.2, 0.4])),
                    (Name::new(""), weights(vec![0.9])),
                    Name::new("Joint"),
                ],
            ))
            .id();
        let stray = world.spawn(weights(vec![0.1])).id();

        let sources = world
            .run_system_once(
                move |children: Query<&Children>,
                      morphs: Query<(Option<&Name>, &MorphWeights)>,
                      meshes: Res<Assets<Mesh>>| {
                    collect_morph_sources(root, &children, &morphs, &meshes)
                },
            )
            .expect("collect system runs");

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Face");
        assert_eq!(sources[0].weights, vec![0.2, 0.4]);
        assert_eq!(sources[1].title, "mesh #1");
        assert!(sources.iter().all(|source| source.entity != stray));
        assert!(sources[0].target_names.is_empty());
    }

    fn panel_world() -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Events<ModelReadyEvent>>();
        world
            .run_system_once(spawn_morph_panel)
            .expect("spawn panel system runs");
        world
    }

    fn ready(world: &mut World, root: Entity) {
        world.send_event(ModelReadyEvent { root });
        world
            .run_system_once(rebuild_morph_controls)
            .expect("rebuild system runs");
    }

    fn panel_display(world: &mut World) -> Display {
        world
            .query_filtered::<&Node, With<MorphPanel>>()
            .single(world)
            .expect("one morph panel")
            .display
    }

    fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
        world.query_filtered::<(), F>().iter(world).count()
    }

    #[test]
    fn panel_stays_hidden_without_morph_meshes() {
        let mut world = panel_world();
        let root = world
            .spawn((Name::new("vCube"), children![Name::new("Cube")]))
            .id();
        world.insert_resource(SceneLifecycle::displaying("vCube", root));

        ready(&mut world, root);

        assert_eq!(panel_display(&mut world), Display::None);
        assert_eq!(count::<With<MorphGroupNode>>(&mut world), 0);
    }

    #[test]
    fn one_group_node_per_morph_entity() {
        let mut world = panel_world();
        let weights = |values: Vec<f32>| MorphWeights::new(values, None).expect("morph weights");
        let root = world
            .spawn((
                Name::new("morph_test"),
                children![
                    (Name::new("Face"), weights(vec![0.0, 0.5])),
                    (Name::new("Body"), weights(vec![1.0])),
                    Name::new("Joint"),
                ],
            ))
            .id();
        world.insert_resource(SceneLifecycle::displaying("morph_test", root));

        ready(&mut world, root);

        assert_eq!(panel_display(&mut world), Display::Flex);
        assert_eq!(count::<With<MorphGroupNode>>(&mut world), 2);
        assert_eq!(count::<With<MorphSlider>>(&mut world), 3);
    }

    #[test]
    fn readiness_of_a_detached_node_is_ignored() {
        let mut world = panel_world();
        let stale = world
            .spawn(MorphWeights::new(vec![0.3], None).expect("morph weights"))
            .id();
        let current = world.spawn(Name::new("vCube")).id();
        world.insert_resource(SceneLifecycle::displaying("vCube", current));

        ready(&mut world, stale);

        assert_eq!(panel_display(&mut world), Display::None);
        assert_eq!(count::<With<MorphGroupNode>>(&mut world), 0);
    }

    #[test]
    fn pressed_track_writes_the_snapped_weight() {
        let mut world = World::new();
        let target = world
            .spawn(MorphWeights::new(vec![0.0, 0.0], None).expect("morph weights"))
            .id();
        let cursor = |x: f32| RelativeCursorPosition {
            normalized: Some(Vec2::new(x, 0.0)),
            ..default()
        };
        world.spawn((
            Interaction::Pressed,
            cursor(0.234),
            MorphSlider { target, index: 1 },
        ));
        world.spawn((
            Interaction::Hovered,
            cursor(0.4),
            MorphSlider { target, index: 0 },
        ));

        world
            .run_system_once(morph_slider_interaction)
            .expect("slider system runs");

        let weights = world.get::<MorphWeights>(target).expect("weights");
        assert_eq!(weights.weights()[0], 0.0);
        assert!((weights.weights()[1] - 0.73).abs() < 1e-6);
    }
}
