//! Tests for game state wiring through the root plugin.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use pretty_assertions::assert_eq;
use wave_arena::GameState;
use wave_arena::gameplay::spawner::WaveSpawner;

fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(InputPlugin);
    // Asset containers normally provided by the render/asset plugins.
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<ColorMaterial>>();
    app.add_plugins(wave_arena::plugin);
    app
}

#[test]
fn game_initializes_in_character_select() {
    let app = create_game_app();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::CharacterSelect);
}

#[test]
fn can_transition_into_the_game() {
    let mut app = create_game_app();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::InGame);
}

#[test]
fn core_resources_exist_after_startup() {
    let mut app = create_game_app();
    app.update();

    assert!(app.world().get_resource::<WaveSpawner>().is_some());
    assert!(
        app.world()
            .get_resource::<wave_arena::gameplay::PlayerHandle>()
            .is_some()
    );
    assert!(
        app.world()
            .get_resource::<wave_arena::camera::CameraView>()
            .is_some()
    );
}
