use std::{fs, io, path::PathBuf};

pub fn get_path(dir: &str, file: &str) -> PathBuf {
    let mut buf = PathBuf::new();

    for chunk in [dir, "migration", "postgresql", file] {
        buf.push(chunk);
    }

    buf
}

pub fn read_migration(dir: &str, file: &str) -> Result<String, io::Error> {
    fs::read_to_string(get_path(dir, file))
}
