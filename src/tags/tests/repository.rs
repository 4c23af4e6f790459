mod create_tag_tests {
    use crate::repository::open_connection;
    use crate::tags::repository;
    use crate::tags::Tag;
    use crate::test::{cleanup, init_db_folder};

    #[test]
    fn create_tag() {
        init_db_folder();
        let con = open_connection();
        let tag = repository::create_tag("test", &con).unwrap();
        con.close().unwrap();
        assert_eq!(
            Tag {
                id: 1,
                name: "test".to_string(),
            },
            tag
        );
        cleanup();
    }
}

mod get_tag_by_name_tests {
    use crate::repository::open_connection;
    use crate::tags::repository::{create_tag, get_tag_by_name};
    use crate::tags::Tag;
    use crate::test::*;

    #[test]
    fn get_tag_by_name_found() {
        init_db_folder();
        let con = open_connection();
        create_tag("test", &con).unwrap();
        let found = get_tag_by_name("test", &con).unwrap();
        con.close().unwrap();
        assert_eq!(
            Some(Tag {
                id: 1,
                name: "test".to_string(),
            }),
            found
        );
        cleanup();
    }

    #[test]
    fn get_tag_by_name_is_case_sensitive() {
        init_db_folder();
        let con = open_connection();
        create_tag("test", &con).unwrap();
        let found = get_tag_by_name("TeSt", &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, found);
        cleanup();
    }

    #[test]
    fn get_tag_by_name_not_found() {
        init_db_folder();
        let con = open_connection();
        let not_found = get_tag_by_name("test", &con).unwrap();
        con.close().unwrap();
        assert_eq!(None, not_found);
        cleanup();
    }
}

mod get_tags_by_names_tests {
    use crate::repository::open_connection;
    use crate::tags::repository::{create_tag, get_tags_by_names};
    use crate::test::*;

    #[test]
    fn skips_missing_names() {
        init_db_folder();
        let con = open_connection();
        create_tag("a", &con).unwrap();
        create_tag("b", &con).unwrap();
        let names = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let found: Vec<String> = get_tags_by_names(&names, &con)
            .unwrap()
            .into_iter()
            .map(|it| it.name)
            .collect();
        con.close().unwrap();
        assert_eq!(vec!["a", "b"], found);
        cleanup();
    }
}

mod get_tags_for_tags_tests {
    use crate::repository::open_connection;
    use crate::tags::repository::get_tags_for_tags;
    use crate::test::*;

    fn names(tag_ids: &[u32]) -> Vec<String> {
        let con = open_connection();
        let tags = get_tags_for_tags(tag_ids, &con).unwrap();
        con.close().unwrap();
        tags.into_iter().map(|it| it.name).collect()
    }

    #[test]
    fn only_tags_on_files_with_every_tag() {
        init_db_folder();
        let music = create_tag_db_entry("music");
        let rock = create_tag_db_entry("rock");
        let jazz = create_tag_db_entry("jazz");
        let live = create_tag_db_entry("live");
        let song = create_file_db_entry("/music/song.ogg", false);
        let other = create_file_db_entry("/music/other.ogg", false);
        tag_file_db_entry(song, music);
        tag_file_db_entry(song, rock);
        tag_file_db_entry(song, live);
        tag_file_db_entry(other, music);
        tag_file_db_entry(other, jazz);
        assert_eq!(vec!["jazz", "live", "rock"], names(&[music]));
        assert_eq!(vec!["live"], names(&[music, rock]));
        assert!(names(&[rock, jazz]).is_empty());
        cleanup();
    }

    #[test]
    fn no_tags_means_every_tag_on_a_file() {
        init_db_folder();
        let used = create_tag_db_entry("used");
        create_tag_db_entry("unused");
        let file = create_file_db_entry("/a", false);
        tag_file_db_entry(file, used);
        assert_eq!(vec!["used"], names(&[]));
        cleanup();
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let file = create_file_db_entry("/a", false);
        tag_file_db_entry(file, a);
        tag_file_db_entry(file, b);
        assert_eq!(vec!["b"], names(&[a, a]));
        cleanup();
    }
}

mod update_tag_tests {
    use crate::repository::open_connection;
    use crate::tags::repository::{create_tag, get_tag, update_tag};
    use crate::tags::Tag;
    use crate::test::*;

    #[test]
    fn update_tag_renames() {
        init_db_folder();
        let con = open_connection();
        let tag = create_tag("old", &con).unwrap();
        update_tag(
            &Tag {
                id: tag.id,
                name: "new".to_string(),
            },
            &con,
        )
        .unwrap();
        let updated = get_tag(tag.id, &con).unwrap();
        con.close().unwrap();
        assert_eq!("new", updated.name);
        cleanup();
    }
}

mod copy_file_tags_tests {
    use crate::repository::open_connection;
    use crate::tags::repository::{copy_file_tags, get_tags_for_file};
    use crate::test::*;

    #[test]
    fn copies_every_file() {
        init_db_folder();
        let source = create_tag_db_entry("source");
        let dest = create_tag_db_entry("dest");
        let a = create_file_db_entry("/a", false);
        let b = create_file_db_entry("/b", false);
        tag_file_db_entry(a, source);
        tag_file_db_entry(b, source);
        tag_file_db_entry(b, dest);
        let con = open_connection();
        copy_file_tags(source, dest, &con).unwrap();
        let a_tags = get_tags_for_file(a, &con).unwrap();
        let b_tags = get_tags_for_file(b, &con).unwrap();
        con.close().unwrap();
        assert_eq!(2, a_tags.len());
        assert_eq!(2, b_tags.len());
        cleanup();
    }
}
