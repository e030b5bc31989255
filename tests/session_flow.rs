mod support;

use romshelf::config::{self, AppConfig, FeatureFlags};
use romshelf::launch::{PakEmulators, shell_quote};
use romshelf::library::{DirectoryKind, EntryKind, LibraryPaths};
use romshelf::session::{Outcome, Session};
use support::{env::ConfigHomeGuard, library::LibraryTree};

fn names(session: &Session) -> Vec<String> {
    session
        .top()
        .entries
        .iter()
        .map(|entry| entry.label().to_string())
        .collect()
}

fn start(paths: &LibraryPaths, features: FeatureFlags, page_size: usize) -> Session {
    Session::start(
        paths.clone(),
        features,
        page_size,
        Box::new(PakEmulators::new(paths)),
    )
}

fn handheld_library() -> LibraryTree {
    let tree = LibraryTree::new();
    tree.emulator("GB");
    tree.emulator("SGB");
    tree.file("Roms/Game Boy (GB)/Tetris (World).gb");
    tree.file("Roms/Game Boy (GB)/Zelda.gb");
    tree.file("Roms/Game Boy (SGB)/Kirby.gb");
    tree.file("Roms/Genesis (MD)/Sonic.md");
    tree.file("Roms/.hidden (GB)/secret.gb");
    tree.write("Collections/Favorites.txt", "/Roms/Game Boy (GB)/Zelda.gb\n");
    tree.dir(&format!("Tools/{}/Clock.pak", support::library::PLATFORM));
    tree
}

#[test]
fn browse_launch_and_restart_round_trip() {
    let tree = handheld_library();
    let config_home = tree.temp.path().join("config");
    let _env = ConfigHomeGuard::set(config_home);

    let mut settings = AppConfig::default();
    settings.library = tree.settings.clone();
    settings.layout.page_size = 2;
    config::save_to_path(&settings, &config::config_path().unwrap()).unwrap();
    let loaded = config::load_or_default().unwrap();
    assert_eq!(loaded, settings);

    let paths = LibraryPaths::from_settings(&loaded.library);
    let mut session = start(&paths, loaded.features, loaded.layout.page_size);
    assert_eq!(session.top().kind, DirectoryKind::Root);
    assert_eq!(names(&session), vec!["Game Boy", "Collections", "Tools"]);

    session.open_selected(false).unwrap();
    assert_eq!(session.top().kind, DirectoryKind::Console);
    assert_eq!(names(&session), vec!["Kirby", "Tetris", "Zelda"]);
    assert!(session.move_selection(1, true));

    let request = match session.open_selected(false).unwrap() {
        Outcome::Launch(request) => request,
        Outcome::Browsing => panic!("expected a launch"),
    };
    let rom = tree.path("Roms/Game Boy (GB)/Tetris (World).gb");
    assert_eq!(request.target, rom);
    assert_eq!(request.emulator.as_deref(), Some("GB"));
    request.queue(&paths).unwrap();
    assert_eq!(
        std::fs::read_to_string(&paths.next_command_file).unwrap(),
        format!(
            "{} {}",
            shell_quote(&tree.path(".system/handheld/paks/Emus/GB.pak/launch.sh").to_string_lossy()),
            shell_quote(&rom.to_string_lossy())
        )
    );
    assert_eq!(std::fs::read_to_string(&paths.resume_slot_file).unwrap(), "8");

    let mut session = start(&paths, loaded.features, loaded.layout.page_size);
    assert_eq!(session.depth(), 2);
    assert_eq!(session.selected_entry().unwrap().path(), rom.as_path());
    let top = session.top();
    assert_eq!((top.selected, top.start, top.end), (1, 0, 2));

    assert!(session.close());
    assert_eq!(
        names(&session),
        vec!["Recently Played", "Game Boy", "Collections", "Tools"]
    );
    assert_eq!(session.top().selected, 1);
    session.move_selection(-1, false);
    session.open_selected(false).unwrap();
    assert_eq!(session.top().kind, DirectoryKind::Recents);
    let recent = session.selected_entry().unwrap();
    assert_eq!(recent.label(), "Tetris");
    assert_eq!(recent.kind, EntryKind::RomFile);
}

#[test]
fn collections_and_tools_follow_feature_flags() {
    let tree = handheld_library();
    let paths = LibraryPaths::from_settings(&tree.settings);
    let simple = FeatureFlags {
        simple_mode: true,
        ..FeatureFlags::default()
    };
    let mut session = start(&paths, simple, 8);
    assert_eq!(names(&session), vec!["Game Boy", "Collections"]);

    session.move_selection(1, false);
    session.open_selected(false).unwrap();
    assert_eq!(session.top().kind, DirectoryKind::CollectionsFolder);
    assert_eq!(names(&session), vec!["Favorites"]);
    session.open_selected(false).unwrap();
    assert_eq!(session.top().kind, DirectoryKind::Collection);
    assert_eq!(names(&session), vec!["Zelda"]);

    match session.open_selected(false).unwrap() {
        Outcome::Launch(request) => {
            assert_eq!(request.target, tree.path("Roms/Game Boy (GB)/Zelda.gb"))
        }
        Outcome::Browsing => panic!("expected a launch"),
    }
    assert_eq!(
        std::fs::read_to_string(&paths.last_file).unwrap(),
        tree.path("Collections/Favorites.txt/Zelda.gb").to_string_lossy()
    );

    let session = start(&paths, simple, 8);
    assert_eq!(session.depth(), 3);
    assert_eq!(session.top().kind, DirectoryKind::Collection);
}

#[test]
fn pak_tools_launch_their_script() {
    let tree = handheld_library();
    let paths = LibraryPaths::from_settings(&tree.settings);
    let mut session = start(&paths, FeatureFlags::default(), 8);
    session.move_selection(-1, true);
    assert_eq!(session.selected_entry().unwrap().label(), "Tools");
    session.open_selected(false).unwrap();
    assert_eq!(session.top().kind, DirectoryKind::Plain);
    let pak = session.selected_entry().unwrap();
    assert_eq!(pak.kind, EntryKind::PackageApp);
    assert_eq!(pak.label(), "Clock");

    match session.open_selected(false).unwrap() {
        Outcome::Launch(request) => {
            let pak = tree.path("Tools/handheld/Clock.pak");
            assert_eq!(request.command, shell_quote(&pak.join("launch.sh").to_string_lossy()));
            assert_eq!(request.resume_slot, None);
        }
        Outcome::Browsing => panic!("expected a launch"),
    }
    assert!(session.recents().is_empty());
}

#[test]
fn change_disc_handoff_becomes_newest_recent() {
    let tree = handheld_library();
    let paths = LibraryPaths::from_settings(&tree.settings);
    let disc = tree.file("Roms/Game Boy (GB)/Zelda.gb");
    romshelf::store::write_file(&paths.change_disc_file, &disc.to_string_lossy()).unwrap();

    let session = start(&paths, FeatureFlags::default(), 8);
    assert_eq!(session.recents().len(), 1);
    assert_eq!(session.recents().get(0).unwrap().path, "/Roms/Game Boy (GB)/Zelda.gb");
    assert!(!paths.change_disc_file.exists());
    assert_eq!(
        std::fs::read_to_string(&paths.recents_file).unwrap().trim(),
        "/Roms/Game Boy (GB)/Zelda.gb"
    );
}
