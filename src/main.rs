#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

use crate::repository::initialize_db;

mod config;
mod db_migrations;
mod files;
mod implications;
mod logging;
mod model;
mod path_tree;
mod repository;
mod tags;
#[cfg(test)]
mod test;
mod util;
mod vfs;

#[launch]
fn rocket() -> Rocket<Build> {
    #[cfg(not(test))]
    logging::init_logging(&crate::config::TAG_FS_CONFIG.logging);
    initialize_db().unwrap();
    #[cfg(all(feature = "fuse", not(test)))]
    spawn_vfs();
    rocket::build()
        .mount(
            "/tags",
            routes![
                tags::handler::get_all_tags,
                tags::handler::get_tag,
                tags::handler::get_related_tags,
                tags::handler::create_tag,
                tags::handler::update_tag,
                tags::handler::copy_tag,
                tags::handler::delete_tag,
                tags::handler::delete_tags
            ],
        )
        .mount(
            "/implications",
            routes![
                implications::handler::get_implications,
                implications::handler::add_implication,
                implications::handler::remove_implication,
                implications::handler::remove_implications_for_tag
            ],
        )
        .mount(
            "/files",
            routes![
                files::handler::list_files,
                files::handler::get_status,
                files::handler::repair,
                files::handler::get_file,
                files::handler::get_file_by_path,
                files::handler::get_file_tags,
                files::handler::get_path_tags,
                files::handler::tag_file,
                files::handler::untag_file
            ],
        )
}

/// mounts the tag hierarchy on its own thread, if a mount point is configured
#[cfg(all(feature = "fuse", not(test)))]
fn spawn_vfs() {
    let vfs_config = crate::config::TAG_FS_CONFIG.vfs.clone();
    let Some(mount_point) = vfs_config.mount_point.clone() else {
        log::info!("No mount point configured, skipping the tag mount");
        return;
    };
    let res = std::thread::Builder::new()
        .name("tag_fs_vfs".to_string())
        .spawn(move || {
            if let Err(e) = vfs::fuse::mount(&mount_point, &vfs_config) {
                log::error!("Failed to mount tag hierarchy at {mount_point}: {e}");
            }
        });
    if let Err(e) = res {
        log::error!("Failed to start the tag mount thread: {e}");
    }
}
