use super::*;

fn first_system_font_file() -> Option<std::path::PathBuf> {
    let lib = FontLibrary::system();
    lib.db.faces().find_map(|f| match &f.source {
        fontdb::Source::File(p) => Some(p.clone()),
        _ => None,
    })
}

#[test]
fn empty_library_resolves_nothing() {
    let lib = FontLibrary::empty();
    assert!(lib.is_empty());
    assert!(lib.resolve("Arial", 700).is_none());
}

#[test]
fn missing_custom_dir_is_a_validation_error() {
    let err = FontLibrary::empty()
        .with_custom_dir("/definitely/not/a/fonts/dir")
        .unwrap_err();
    assert!(matches!(err, PosterError::Validation(_)));
}

#[test]
fn unknown_family_falls_back_to_some_face() {
    let lib = FontLibrary::system();
    if lib.is_empty() {
        eprintln!("skipping: no system fonts");
        return;
    }
    let f = lib.resolve("No Such Family 12345", 400).unwrap();
    assert!(!f.data.is_empty());
}

#[test]
fn custom_font_is_found_by_file_stem() {
    let Some(path) = first_system_font_file() else {
        eprintln!("skipping: no file-backed system fonts");
        return;
    };
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_fonts_stem");
    std::fs::create_dir_all(&dir).unwrap();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("ttf");
    std::fs::copy(&path, dir.join(format!("PosterDisplay.{ext}"))).unwrap();

    let lib = FontLibrary::empty().with_custom_dir(&dir).unwrap();
    assert!(lib.face_count() > 0);
    let f = lib.resolve("posterdisplay", 700).unwrap();
    assert_eq!(f.data.len(), std::fs::metadata(&path).unwrap().len() as usize);
}

#[test]
fn font_data_registers_family_name() {
    let Some(path) = first_system_font_file() else {
        eprintln!("skipping: no file-backed system fonts");
        return;
    };
    let lib = FontLibrary::empty().with_font_data(std::fs::read(&path).unwrap());
    let family = lib.db.faces().next().unwrap().families[0].0.clone();
    let f = lib.resolve(&family.to_uppercase(), 400).unwrap();
    assert_eq!(f.family, family);
}
