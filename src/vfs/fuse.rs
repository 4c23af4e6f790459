use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use fuser::{
    FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyCreate, ReplyData,
    ReplyDirectory, ReplyEmpty, ReplyEntry, ReplyOpen, Request,
};

use crate::config::VfsConfig;
use crate::model::error::vfs_errors::VfsError;
use crate::vfs::projection::{EntryAttr, EntryKind, Projection};

const ROOT_INO: u64 = 1;

/// the kernel asks again after this long, so changes to the database show up quickly
const TTL: Duration = Duration::from_secs(1);

/// the errno reported back to the kernel for each error
pub fn errno(error: &VfsError) -> libc::c_int {
    match error {
        VfsError::NotFound => libc::ENOENT,
        VfsError::NotPermitted => libc::EPERM,
        VfsError::Unsupported => libc::ENOSYS,
        VfsError::Internal(_) => libc::EIO,
    }
}

/// hands out inode numbers for virtual paths. Holds nothing but the path strings themselves.
///
/// A path stays in the table while the kernel holds a reference to it: every `lookup` reply adds one,
/// and `forget` takes them away again. The root is never dropped
#[derive(Debug)]
pub struct InodeTable {
    paths: HashMap<u64, InodeEntry>,
    inodes: HashMap<String, u64>,
    next: u64,
}

#[derive(Debug)]
struct InodeEntry {
    path: String,
    lookups: u64,
}

impl InodeTable {
    pub fn new() -> InodeTable {
        let mut table = InodeTable {
            paths: HashMap::new(),
            inodes: HashMap::new(),
            next: ROOT_INO + 1,
        };
        table.paths.insert(
            ROOT_INO,
            InodeEntry {
                path: String::new(),
                lookups: 0,
            },
        );
        table.inodes.insert(String::new(), ROOT_INO);
        table
    }

    pub fn path(&self, ino: u64) -> Option<&str> {
        self.paths.get(&ino).map(|it| it.path.as_str())
    }

    /// returns the inode for `path` and counts one more kernel reference to it,
    /// assigning a new inode the first time it's seen
    pub fn lookup(&mut self, path: &str) -> u64 {
        let ino = match self.inodes.get(path) {
            Some(ino) => *ino,
            None => {
                let ino = self.next_ino();
                self.paths.insert(
                    ino,
                    InodeEntry {
                        path: path.to_string(),
                        lookups: 0,
                    },
                );
                self.inodes.insert(path.to_string(), ino);
                ino
            }
        };
        if let Some(entry) = self.paths.get_mut(&ino) {
            entry.lookups += 1;
        }
        ino
    }

    /// the inode to list `path` under in a directory listing. Listings don't give the kernel a reference,
    /// so paths that aren't known yet get a number that's never handed out again instead of an entry
    pub fn listing_inode(&mut self, path: &str) -> u64 {
        match self.inodes.get(path) {
            Some(ino) => *ino,
            None => self.next_ino(),
        }
    }

    /// drops `nlookup` kernel references to `ino`, removing the path once none are left
    pub fn forget(&mut self, ino: u64, nlookup: u64) {
        if ino == ROOT_INO {
            return;
        }
        let Some(entry) = self.paths.get_mut(&ino) else {
            return;
        };
        entry.lookups = entry.lookups.saturating_sub(nlookup);
        if entry.lookups == 0 {
            if let Some(entry) = self.paths.remove(&ino) {
                self.inodes.remove(&entry.path);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    fn next_ino(&mut self) -> u64 {
        let ino = self.next;
        self.next += 1;
        ino
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        InodeTable::new()
    }
}

/// joins a child name onto a virtual path
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// adapts [`Projection`] to the kernel's inode based requests
pub struct TagFs {
    projection: Projection,
    inodes: InodeTable,
    uid: u32,
    gid: u32,
}

impl TagFs {
    pub fn new(projection: Projection) -> TagFs {
        TagFs {
            projection,
            inodes: InodeTable::new(),
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
        }
    }

    fn file_attr(&self, ino: u64, attr: &EntryAttr) -> FileAttr {
        FileAttr {
            ino,
            size: attr.size,
            blocks: 0,
            atime: attr.mtime,
            mtime: attr.mtime,
            ctime: attr.mtime,
            crtime: UNIX_EPOCH,
            kind: file_type(attr.kind),
            perm: attr.perm,
            nlink: match attr.kind {
                EntryKind::Directory => 2,
                EntryKind::Symlink => 1,
            },
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: 4096,
            flags: 0,
        }
    }

    fn child(&self, parent: u64, name: &OsStr) -> Result<String, VfsError> {
        let parent = self.inodes.path(parent).ok_or(VfsError::NotFound)?;
        let name = name.to_str().ok_or(VfsError::NotFound)?;
        Ok(child_path(parent, name))
    }
}

fn file_type(kind: EntryKind) -> FileType {
    match kind {
        EntryKind::Directory => FileType::Directory,
        EntryKind::Symlink => FileType::Symlink,
    }
}

impl Filesystem for TagFs {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let attr = self
            .child(parent, name)
            .and_then(|path| self.projection.get_attr(&path).map(|attr| (path, attr)));
        match attr {
            Ok((path, attr)) => {
                let ino = self.inodes.lookup(&path);
                reply.entry(&TTL, &self.file_attr(ino, &attr), 0);
            }
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn forget(&mut self, _req: &Request<'_>, ino: u64, nlookup: u64) {
        self.inodes.forget(ino, nlookup);
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let attr = match self.inodes.path(ino) {
            Some(path) => self.projection.get_attr(path),
            None => Err(VfsError::NotFound),
        };
        match attr {
            Ok(attr) => reply.attr(&TTL, &self.file_attr(ino, &attr)),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn readlink(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyData) {
        let target = match self.inodes.path(ino) {
            Some(path) => self.projection.read_link(path),
            None => Err(VfsError::NotFound),
        };
        match target {
            Ok(target) => reply.data(target.as_bytes()),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        let attr = match self.inodes.path(ino) {
            Some(path) => self.projection.get_attr(path),
            None => Err(VfsError::NotFound),
        };
        match attr {
            Ok(attr) if attr.kind == EntryKind::Directory => reply.opened(0, 0),
            Ok(_) => reply.error(libc::ENOTDIR),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        if offset < 0 {
            reply.error(libc::EINVAL);
            return;
        }
        let Some(path) = self.inodes.path(ino).map(|it| it.to_string()) else {
            reply.error(libc::ENOENT);
            return;
        };
        let listing = match self.projection.read_dir(&path) {
            Ok(listing) => listing,
            Err(e) => {
                reply.error(errno(&e));
                return;
            }
        };
        let parent_ino = match path.rsplit_once('/') {
            Some((parent, _)) => self.inodes.listing_inode(parent),
            None => ROOT_INO,
        };
        let mut entries: Vec<(u64, FileType, String)> = vec![
            (ino, FileType::Directory, ".".to_string()),
            (parent_ino, FileType::Directory, "..".to_string()),
        ];
        for entry in listing {
            let child_ino = self.inodes.listing_inode(&child_path(&path, &entry.name));
            entries.push((child_ino, file_type(entry.kind), entry.name));
        }
        for (i, (ino, kind, name)) in entries.into_iter().enumerate().skip(offset as usize) {
            // true means the reply buffer is full
            if reply.add(ino, (i + 1) as i64, kind, &name) {
                break;
            }
        }
        reply.ok();
    }

    fn unlink(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        // the kernel forgets the inode on its own once the entry is gone
        let res = self
            .child(parent, name)
            .and_then(|path| self.projection.unlink(&path));
        match res {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn mkdir(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        reply.error(errno(&self.projection.unsupported("mkdir")));
    }

    fn rmdir(&mut self, _req: &Request<'_>, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(errno(&self.projection.unsupported("rmdir")));
    }

    fn symlink(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _link_name: &OsStr,
        _target: &Path,
        reply: ReplyEntry,
    ) {
        reply.error(errno(&self.projection.unsupported("symlink")));
    }

    fn rename(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _newparent: u64,
        _newname: &OsStr,
        _flags: u32,
        reply: ReplyEmpty,
    ) {
        reply.error(errno(&self.projection.unsupported("rename")));
    }

    fn link(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _newparent: u64,
        _newname: &OsStr,
        reply: ReplyEntry,
    ) {
        reply.error(errno(&self.projection.unsupported("link")));
    }

    fn create(
        &mut self,
        _req: &Request<'_>,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        reply.error(errno(&self.projection.unsupported("create")));
    }
}

/// mounts the tag hierarchy at `mount_point`, blocking until it's unmounted
pub fn mount(mount_point: &str, config: &VfsConfig) -> std::io::Result<()> {
    let mut options = vec![
        MountOption::FSName("tag_fs".to_string()),
        MountOption::AutoUnmount,
    ];
    if config.allow_other {
        options.push(MountOption::AllowOther);
    }
    log::info!(
        "Mounting tag hierarchy at {mount_point} with tag root {}",
        config.tag_root
    );
    let fs = TagFs::new(Projection::new(&config.tag_root));
    fuser::mount2(fs, Path::new(mount_point), &options)
}
