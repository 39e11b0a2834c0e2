use bevy::prelude::*;
use crate::shared::*;

/// Height above the speaker's origin where the label is anchored.
const LABEL_HEIGHT: f32 = 2.6;
const LABEL_WIDTH: f32 = 260.0;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Screen-space text node showing the `DialogueMarker` of `owner`.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpeechLabel {
    pub owner: Entity,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / SYNC
// ═══════════════════════════════════════════════════════════════════════

/// System: give every new speaker a label node.
pub fn attach_speech_labels(
    mut commands: Commands,
    speakers: Query<(Entity, &DialogueMarker), Added<DialogueMarker>>,
) {
    for (owner, marker) in &speakers {
        commands.spawn((
            SpeechLabel { owner },
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH),
                padding: UiRect::all(Val::Px(6.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.05, 0.05, 0.7)),
            Text::new(marker.text.clone()),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::srgb(0.98, 0.95, 0.85)),
            TextLayout::new_with_justify(JustifyText::Center),
            Visibility::Hidden,
        ));
    }
}

/// System: copy marker text onto its label whenever the marker changes.
pub fn sync_speech_labels(
    speakers: Query<&DialogueMarker, Changed<DialogueMarker>>,
    mut labels: Query<(&SpeechLabel, &mut Text)>,
) {
    for (label, mut text) in &mut labels {
        if let Ok(marker) = speakers.get(label.owner) {
            if text.0 != marker.text {
                text.0 = marker.text.clone();
            }
        }
    }
}

/// System: labels whose speaker is gone are removed.
pub fn remove_orphan_labels(
    mut commands: Commands,
    labels: Query<(Entity, &SpeechLabel)>,
    speakers: Query<(), With<DialogueMarker>>,
) {
    for (entity, label) in &labels {
        if !speakers.contains(label.owner) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// POSITIONING
// ═══════════════════════════════════════════════════════════════════════

/// System: project each speaker's head into the viewport and pin its label
/// there. Labels behind the camera are hidden.
pub fn follow_speakers(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    speakers: Query<&GlobalTransform, With<DialogueMarker>>,
    mut labels: Query<(&SpeechLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    for (label, mut node, mut visibility) in &mut labels {
        let Ok(speaker) = speakers.get(label.owner) else {
            continue;
        };
        let anchor = speaker.translation() + Vec3::Y * LABEL_HEIGHT;
        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) => {
                node.left = Val::Px(screen.x - LABEL_WIDTH / 2.0);
                node.top = Val::Px(screen.y);
                *visibility = Visibility::Inherited;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }
}
