#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{build::RepoBuilder, Commit, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;
use tracker_sync::{RepositoryHandle, Settings};

pub const RECORD: &str = "records/p1/project.toml";
pub const OTHER_RECORD: &str = "records/p2/project.toml";

/// True when a git binary is on PATH; the end-to-end tests need one.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A bare remote plus two independent clones of it.
pub struct Fixture {
    _dir: TempDir,
    pub remote: PathBuf,
    pub alice: PathBuf,
    pub bob: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed");
        let remote = dir.path().join("remote.git");

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let seed_repo = Repository::init_opts(&seed, &opts).unwrap();
        commit_file(&seed_repo, RECORD, "project_id = \"P-001\"\nstatus = \"planning\"\n", "Add P-001");
        commit_file(&seed_repo, OTHER_RECORD, "project_id = \"P-002\"\nstatus = \"active\"\n", "Add P-002");

        RepoBuilder::new()
            .bare(true)
            .clone(seed.to_str().unwrap(), &remote)
            .unwrap();

        let alice = clone_as(&remote, &dir.path().join("alice"), "Alice");
        let bob = clone_as(&remote, &dir.path().join("bob"), "Bob");

        Self {
            _dir: dir,
            remote,
            alice,
            bob,
        }
    }

    pub fn settings() -> Settings {
        Settings {
            fetch_interval_secs: 0,
            ..Settings::default()
        }
    }

    pub fn open(path: &Path) -> RepositoryHandle {
        RepositoryHandle::open(path, Self::settings()).unwrap()
    }
}

fn clone_as(remote: &Path, path: &Path, name: &str) -> PathBuf {
    let repo = Repository::clone(remote.to_str().unwrap(), path).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", name).unwrap();
    config
        .set_str("user.email", &format!("{}@example.com", name.to_lowercase()))
        .unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();
    path.to_path_buf()
}

pub fn commit_file(repo: &Repository, rel: &str, content: &str, message: &str) {
    let workdir = repo.workdir().unwrap();
    let path = workdir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(rel)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::now("Seed", "seed@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

pub fn edit(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::write(&path, content).unwrap();
    path
}
