//! Audio collaborator: fire-and-forget attack sounds.
//!
//! Combat systems post an [`AttackSound`] message; this module picks one of
//! the loaded clips at random and plays it on a despawn-when-done entity.
//! Nothing ever reads back from here.

use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings};
use bevy::prelude::*;
use rand::Rng;

use crate::gameplay::SimRng;

/// Attack clip paths, loaded once at startup.
const ATTACK_CLIP_PATHS: &[&str] = &[
    "audio/attack_0.ogg",
    "audio/attack_1.ogg",
    "audio/attack_2.ogg",
];

// === Messages ===

/// Something attacked; play one random attack clip.
#[derive(Message, Debug, Clone, Copy)]
pub struct AttackSound;

// === Resources ===

/// Loaded attack clips.
#[derive(Resource, Debug, Default)]
pub struct AttackSounds(pub Vec<Handle<AudioSource>>);

// === Systems ===

/// Loads the clip bank. Headless apps (tests) have no asset server and
/// simply skip audio.
fn load_attack_sounds(asset_server: Option<Res<AssetServer>>, mut commands: Commands) {
    let Some(asset_server) = asset_server else {
        return;
    };
    let clips = ATTACK_CLIP_PATHS
        .iter()
        .map(|path| asset_server.load(*path))
        .collect();
    commands.insert_resource(AttackSounds(clips));
}

/// Drains attack-sound requests and spawns one playback entity per request.
fn play_attack_sounds(
    mut requests: MessageReader<AttackSound>,
    sounds: Option<Res<AttackSounds>>,
    mut rng: ResMut<SimRng>,
    mut commands: Commands,
) {
    let count = requests.read().count();
    if count == 0 {
        return;
    }
    let Some(sounds) = sounds else {
        return;
    };
    if sounds.0.is_empty() {
        return;
    }
    for _ in 0..count {
        let index = rng.0.random_range(0..sounds.0.len());
        commands.spawn((
            AudioPlayer(sounds.0[index].clone()),
            PlaybackSettings::DESPAWN,
        ));
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_message::<AttackSound>();

    app.add_systems(Startup, load_attack_sounds);
    app.add_systems(Update, play_attack_sounds);
}
