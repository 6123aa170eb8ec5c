use eyre::eyre;
use std::fs;
use std::path::{Path, PathBuf};

/// Gets every `.in` fixture for a stage, sorted by name
pub fn fixtures(stage: &str) -> eyre::Result<Vec<PathBuf>> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(stage);
    let mut inputs = fs::read_dir(&dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    inputs.retain(|path| path.extension().is_some_and(|ext| ext == "in"));
    inputs.sort();
    if inputs.is_empty() {
        return Err(eyre!("no fixtures in {dir:?}"));
    }
    Ok(inputs)
}

/// Trailing whitespace is not significant
pub fn normalize(s: &str) -> String {
    s.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

/// Compares output against the `.out` file next to the input
pub fn assert_fixture(input: &Path, actual: &str) -> eyre::Result<()> {
    let expected = fs::read_to_string(input.with_extension("out"))?;
    assert_eq!(
        normalize(actual),
        normalize(&expected),
        "output of {input:?} does not match"
    );
    Ok(())
}
