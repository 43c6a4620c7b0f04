use dupescan::duplicates::find_duplicates;
use dupescan::inventory::{Inventory, InventoryBuilder, InventoryConfig};
use dupescan::scanner::{hash_to_hex, Hasher};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn scan(roots: &[&Path]) -> Inventory {
    let roots: Vec<_> = roots.iter().map(|p| p.to_path_buf()).collect();
    let (inventory, _stats) = InventoryBuilder::new(InventoryConfig::default())
        .build(&roots)
        .unwrap();
    inventory
}

#[test]
fn test_distinct_files_produce_no_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), b"one").unwrap();
    fs::write(dir.path().join("two.txt"), b"two").unwrap();
    fs::write(dir.path().join("three.txt"), b"three").unwrap();

    let inventory = scan(&[dir.path()]);
    let groups = find_duplicates(&inventory);

    assert_eq!(inventory.len(), 3);
    assert!(groups.is_empty());
}

#[test]
fn test_two_identical_one_distinct() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    fs::write(dir.path().join("c.txt"), b"unique").unwrap();

    let groups = find_duplicates(&scan(&[dir.path()]));

    assert_eq!(groups.len(), 1);
    let key = hash_to_hex(&Hasher::hash_bytes(b"dup"));
    let files = groups.get(&key).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert!(groups
        .iter()
        .flat_map(|(_, files)| files)
        .all(|f| f.filename != "c.txt"));
}

#[test]
fn test_nested_directories_are_descended() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("x").join("y").join("z");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("top.bin"), b"same bytes").unwrap();
    fs::write(deep.join("bottom.bin"), b"same bytes").unwrap();

    let inventory = scan(&[dir.path()]);
    let groups = find_duplicates(&inventory);

    // Directories never show up as records
    assert_eq!(inventory.len(), 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.file_count(), 2);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();

    let groups = find_duplicates(&scan(&[dir.path()]));

    assert_eq!(groups.len(), 1);
    let (_, files) = groups.iter().next().unwrap();
    assert!(files.iter().all(|f| f.size == 0));
    assert_eq!(groups.reclaimable_bytes(), 0);
}

#[test]
fn test_checksums_match_independent_hash() {
    let dir = tempdir().unwrap();
    let contents: [&[u8]; 4] = [b"alpha", b"alpha", b"beta", b"beta"];
    for (i, content) in contents.iter().enumerate() {
        fs::write(dir.path().join(format!("f{i}.dat")), content).unwrap();
    }

    let groups = find_duplicates(&scan(&[dir.path()]));
    assert_eq!(groups.len(), 2);

    for (checksum, files) in groups.iter() {
        assert!(files.len() >= 2);
        for file in files {
            let bytes = fs::read(&file.path).unwrap();
            assert_eq!(file.checksum, hash_to_hex(&Hasher::hash_bytes(&bytes)));
            assert_eq!(file.checksum, checksum);
            assert_eq!(file.size, bytes.len() as u64);
        }
    }
}

#[test]
fn test_records_carry_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dated.txt");
    let mut f = File::create(&path).unwrap();
    f.write_all(b"when").unwrap();
    drop(f);

    let mtime = filetime::FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(&path, mtime).unwrap();

    let inventory = scan(&[dir.path()]);
    let record = &inventory.records()[0];

    assert_eq!(record.filename, "dated.txt");
    assert_eq!(record.path, path.to_string_lossy());
    assert_eq!(record.size, 4);
    assert_eq!(record.last_modified.timestamp(), 1_600_000_000);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();
    fs::write(dir.path().join("sub").join("b"), b"x").unwrap();
    fs::write(dir.path().join("c"), b"y").unwrap();
    fs::write(dir.path().join("sub").join("d"), b"y").unwrap();

    let first = find_duplicates(&scan(&[dir.path()]));
    let second = find_duplicates(&scan(&[dir.path()]));

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_root_that_is_a_file_is_recorded() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("lonely.txt");
    fs::write(&file, b"solo").unwrap();

    let inventory = scan(&[file.as_path(), file.as_path()]);
    let groups = find_duplicates(&inventory);

    assert_eq!(inventory.len(), 2);
    assert_eq!(groups.len(), 1);
}

#[test]
#[cfg(unix)]
fn test_symlinked_copy_joins_target_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), b"hello").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt"))
        .unwrap();

    let inventory = scan(&[dir.path()]);
    let groups = find_duplicates(&inventory);

    assert_eq!(inventory.len(), 2);
    let key = hash_to_hex(&Hasher::hash_bytes(b"hello"));
    let names: Vec<_> = groups
        .get(&key)
        .unwrap()
        .iter()
        .map(|f| f.filename.as_str())
        .collect();
    assert_eq!(names, vec!["alias.txt", "real.txt"]);
}
