use bevy::prelude::*;
use crate::shared::*;

const BUTTON_NORMAL: Color = Color::srgb(0.28, 0.2, 0.12);
const BUTTON_HOVERED: Color = Color::srgb(0.4, 0.3, 0.18);
const BUTTON_PRESSED: Color = Color::srgb(0.55, 0.42, 0.22);

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct OptionBarRoot;

/// One answer button; `index` is its position in `ButtonOptions::choices`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionButton {
    pub index: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / REBUILD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_option_bar(mut commands: Commands) {
    commands.spawn((
        OptionBarRoot,
        ButtonOptions::default(),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(12.0),
            ..default()
        },
    ));
}

/// System: replace the bar's buttons whenever its choices change. An empty
/// list leaves an empty bar.
pub fn rebuild_option_buttons(
    mut commands: Commands,
    bars: Query<(Entity, &ButtonOptions), Changed<ButtonOptions>>,
) {
    for (bar, options) in &bars {
        commands.entity(bar).despawn_descendants();
        commands.entity(bar).with_children(|parent| {
            for (index, choice) in options.choices.iter().enumerate() {
                parent
                    .spawn((
                        Button,
                        OptionButton { index },
                        Node {
                            min_width: Val::Px(140.0),
                            padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_NORMAL),
                        BorderRadius::all(Val::Px(6.0)),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(choice.clone()),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_option_clicks(
    buttons: Query<(&Interaction, &OptionButton), Changed<Interaction>>,
    mut choice_writer: EventWriter<ChoiceSelectedEvent>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            choice_writer.send(ChoiceSelectedEvent { index: button.index });
        }
    }
}

pub fn update_option_visuals(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<OptionButton>)>,
) {
    for (interaction, mut color) in &mut buttons {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_NORMAL,
        };
    }
}
