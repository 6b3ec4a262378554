mod common;

use std::fs;

use common::{catalog, fixture, in_section};
use isoworld_store::{
    FORMAT_VERSION, IoMode, Section, SectionCoord, SectionPaths, SectionStore, StoreError,
};

fn evict_all(store: &mut SectionStore, far: i32) {
    for s in 0..4 {
        let (x, y) = in_section(far + s, far);
        store.get_shape(x, y, 0).unwrap();
    }
}

#[test]
fn evicted_section_reloads_identically() {
    let mut f = fixture();
    let (x, y) = in_section(0, 0);
    f.store.set_shape(x, y, 0, 0).unwrap();
    f.store.set_shape(x + 3, y + 1, 23, 1).unwrap();
    f.store.set_edge(x, y + 5, 2).unwrap();
    let before = f.store.section(SectionCoord::new(0, 0)).unwrap().clone();

    evict_all(&mut f.store, 10);
    assert!(!f.store.is_resident(SectionCoord::new(0, 0)));

    let after = f.store.section(SectionCoord::new(0, 0)).unwrap().clone();
    assert_eq!(before, after);
    assert_eq!(f.store.get_shape(x + 3, y + 1, 23).unwrap(), Some(1));
    assert_eq!(f.store.get_edge(x, y + 5).unwrap(), Some(2));
}

#[test]
fn missing_file_is_an_empty_section() {
    let mut f = fixture();
    let s = f.store.section(SectionCoord::new(7, 7)).unwrap();
    assert!(s.is_all_empty());
    assert!(!f.dir.path().join("game/maps").join(SectionCoord::new(7, 7).file_name()).exists());
}

#[test]
fn corrupt_file_is_a_decode_error() {
    let mut f = fixture();
    let maps = f.dir.path().join("game/maps");
    fs::create_dir_all(&maps).unwrap();
    fs::write(maps.join(SectionCoord::new(1, 2).file_name()), [FORMAT_VERSION, 1, 2, 3, 4, 5]).unwrap();
    let err = f.store.get_shape(200, 400, 0).unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }), "{err}");
}

#[test]
fn newer_version_byte_still_decodes() {
    let mut f = fixture();
    f.store.set_shape(5, 5, 5, 1).unwrap();
    f.store.flush_all().unwrap();
    let path = f.dir.path().join("game/maps").join(SectionCoord::new(0, 0).file_name());
    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = FORMAT_VERSION + 1;
    fs::write(&path, bytes).unwrap();

    let paths = SectionPaths::new(f.dir.path().join("game"), f.dir.path().join("user"));
    let mut fresh = SectionStore::new(catalog(), paths);
    assert_eq!(fresh.get_shape(5, 5, 5).unwrap(), Some(1));
}

#[test]
fn flush_all_keeps_sections_resident() {
    let mut f = fixture();
    f.store.set_shape(1, 1, 0, 0).unwrap();
    f.store.set_shape(201, 1, 0, 0).unwrap();
    f.recorder.clear();
    f.store.flush_all().unwrap();
    assert_eq!(f.store.resident().len(), 2);
    assert!(f.recorder.events().is_empty());
    let maps = f.dir.path().join("game/maps");
    assert!(maps.join(SectionCoord::new(0, 0).file_name()).exists());
    assert!(maps.join(SectionCoord::new(1, 0).file_name()).exists());
}

#[test]
fn play_mode_reads_assets_and_writes_user_dir() {
    let mut f = fixture();
    f.store.set_shape(3, 3, 0, 1).unwrap();
    f.store.flush_all().unwrap();

    let game = f.dir.path().join("game");
    let user = f.dir.path().join("user");
    let mut play = SectionStore::new(catalog(), SectionPaths::new(&game, &user));
    play.set_io_mode(IoMode::Play);
    assert_eq!(play.get_shape(3, 3, 0).unwrap(), Some(1));
    play.set_shape(4, 3, 0, 0).unwrap();
    play.flush_all().unwrap();
    assert!(user.join(SectionCoord::new(0, 0).file_name()).exists());

    // The asset copy is untouched by play-mode saves.
    let mut editor = SectionStore::new(catalog(), SectionPaths::new(&game, &user));
    assert_eq!(editor.get_shape(4, 3, 0).unwrap(), None);

    // And play mode now prefers the user copy.
    let mut replay = SectionStore::new(catalog(), SectionPaths::new(&game, &user));
    replay.set_io_mode(IoMode::Play);
    assert_eq!(replay.get_shape(4, 3, 0).unwrap(), Some(0));
}

#[test]
fn unwritable_target_is_an_io_error() {
    let mut f = fixture();
    f.store.set_shape(0, 0, 0, 0).unwrap();
    // A regular file where the maps directory should be.
    let game = f.dir.path().join("game");
    fs::create_dir_all(&game).unwrap();
    fs::write(game.join("maps"), b"not a dir").unwrap();
    let err = f.store.flush_all().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "{err}");
}

#[test]
fn fresh_section_has_expected_dimensions() {
    let s = Section::empty(SectionCoord::new(0, 0));
    assert_eq!(s.positions().len(), 200 * 200 * 24);
    assert_eq!(s.edges().len(), 200 * 200);
}

#[test]
fn far_sections_with_similar_digits_stay_separate() {
    let mut f = fixture();
    let (x, y) = in_section(0x123, 0x45);
    f.store.set_shape(x, y, 0, 1).unwrap();
    f.store.flush_all().unwrap();
    evict_all(&mut f.store, 10);

    let (ox, oy) = in_section(0x12, 0x345);
    assert_eq!(f.store.get_shape(ox, oy, 0).unwrap(), None);
    assert_eq!(f.store.get_shape(x, y, 0).unwrap(), Some(1));
}

#[test]
fn negative_sections_round_trip() {
    let mut f = fixture();
    f.store.set_shape(-5, -5, 2, 0).unwrap();
    f.store.set_shape(5, -5, 2, 1).unwrap();
    evict_all(&mut f.store, 10);
    assert_eq!(f.store.get_shape(-5, -5, 2).unwrap(), Some(0));
    assert_eq!(f.store.get_shape(5, -5, 2).unwrap(), Some(1));
}
