mod validate_tag_name_tests {
    use crate::tags::service::validate_tag_name;

    #[test]
    fn accepts_normal_names() {
        assert_eq!(Ok(()), validate_tag_name("music"));
        assert_eq!(Ok(()), validate_tag_name("year-2024"));
        assert_eq!(Ok(()), validate_tag_name("ünïcödé"));
    }

    #[test]
    fn rejects_banned_names() {
        for name in ["", ".", "..", "-music", "a,b", "a=b", "a b", "a/b"] {
            assert!(
                validate_tag_name(name).is_err(),
                "{name:?} should not be a valid tag name"
            );
        }
    }
}

mod create_tag_tests {
    use crate::model::error::tag_errors::CreateTagError;
    use crate::tags::service::{create_tag, get_tag};
    use crate::test::*;

    #[test]
    fn create_tag_assigns_id() {
        init_db_folder();
        let tag = create_tag("test").unwrap();
        assert_eq!(1, tag.id);
        assert_eq!("test", tag.name);
        assert_eq!(tag, get_tag(1).unwrap());
        cleanup();
    }

    #[test]
    fn create_tag_already_exists() {
        init_db_folder();
        create_tag("test").unwrap();
        let res = create_tag("test").unwrap_err();
        assert_eq!(CreateTagError::AlreadyExists, res);
        cleanup();
    }

    #[test]
    fn create_tag_invalid_name() {
        init_db_folder();
        let res = create_tag("has space").unwrap_err();
        assert!(matches!(res, CreateTagError::InvalidName(_)));
        cleanup();
    }
}

mod get_tag_tests {
    use crate::model::error::tag_errors::GetTagError;
    use crate::tags::service::{create_tag, get_tag, get_tag_by_name};
    use crate::test::*;

    #[test]
    fn test_get_tag() {
        init_db_folder();
        let expected = create_tag("test").unwrap();
        let actual = get_tag(1).unwrap();
        assert_eq!(actual, expected);
        cleanup();
    }

    #[test]
    fn test_get_tag_non_existent() {
        init_db_folder();
        let res = get_tag(1).expect_err("Retrieving a nonexistent tag should return an error");
        assert_eq!(GetTagError::TagNotFound, res);
        cleanup();
    }

    #[test]
    fn test_get_tag_by_name_non_existent() {
        init_db_folder();
        assert_eq!(GetTagError::TagNotFound, get_tag_by_name("nope").unwrap_err());
        cleanup();
    }
}

mod resolve_tag_names_tests {
    use crate::model::error::file_errors::TagRelationError;
    use crate::repository::open_connection;
    use crate::tags::service::resolve_tag_names;
    use crate::tags::Tag;
    use crate::test::*;

    fn get_tags_by_names(names: &[String]) -> Result<Vec<Tag>, TagRelationError> {
        let con = open_connection();
        let res = resolve_tag_names(names, &con);
        con.close().unwrap();
        res
    }

    #[test]
    fn keeps_requested_order() {
        init_db_folder();
        create_tag_db_entry("a");
        create_tag_db_entry("b");
        let names: Vec<String> = get_tags_by_names(&["b".to_string(), "a".to_string()])
            .unwrap()
            .into_iter()
            .map(|it| it.name)
            .collect();
        assert_eq!(vec!["b", "a"], names);
        cleanup();
    }

    #[test]
    fn fails_on_first_missing_name() {
        init_db_folder();
        create_tag_db_entry("a");
        let res = get_tags_by_names(&["a".to_string(), "x".to_string(), "y".to_string()]);
        assert_eq!(TagRelationError::TagNotFound("x".to_string()), res.unwrap_err());
        cleanup();
    }
}

mod rename_tag_tests {
    use crate::model::error::tag_errors::UpdateTagError;
    use crate::tags::service::{create_tag, get_tag, rename_tag, tags_for_file};
    use crate::test::*;

    #[test]
    fn rename_tag_keeps_id_and_files() {
        init_db_folder();
        let tag = create_tag("old").unwrap();
        let file = create_file_db_entry("/a", false);
        tag_file_db_entry(file, tag.id);
        let renamed = rename_tag(tag.id, "new").unwrap();
        assert_eq!(tag.id, renamed.id);
        assert_eq!("new", get_tag(tag.id).unwrap().name);
        assert_eq!(vec![renamed], tags_for_file(file).unwrap());
        cleanup();
    }

    #[test]
    fn rename_tag_to_own_name() {
        init_db_folder();
        let tag = create_tag("same").unwrap();
        assert_eq!(tag, rename_tag(tag.id, "same").unwrap());
        cleanup();
    }

    #[test]
    fn rename_tag_not_found() {
        init_db_folder();
        assert_eq!(UpdateTagError::TagNotFound, rename_tag(1, "what").unwrap_err());
        cleanup();
    }

    #[test]
    fn rename_tag_already_exists() {
        init_db_folder();
        create_tag("first").unwrap();
        let second = create_tag("second").unwrap();
        assert_eq!(
            UpdateTagError::NewNameAlreadyExists,
            rename_tag(second.id, "first").unwrap_err()
        );
        assert_eq!("second", get_tag(second.id).unwrap().name);
        cleanup();
    }

    #[test]
    fn rename_tag_invalid_name() {
        init_db_folder();
        let tag = create_tag("fine").unwrap();
        let res = rename_tag(tag.id, "-bad").unwrap_err();
        assert!(matches!(res, UpdateTagError::InvalidName(_)));
        cleanup();
    }
}

mod copy_tag_tests {
    use crate::model::error::tag_errors::CopyTagError;
    use crate::tags::service::{copy_tag, create_tag, files_with_tags};
    use crate::test::*;

    #[test]
    fn copy_tag_duplicates_files() {
        init_db_folder();
        let source = create_tag("source").unwrap();
        let a = create_file_db_entry("/a", false);
        let b = create_file_db_entry("/b", false);
        tag_file_db_entry(a, source.id);
        tag_file_db_entry(b, source.id);
        let copy = copy_tag(source.id, "copy").unwrap();
        assert_eq!("copy", copy.name);
        assert_ne!(source.id, copy.id);
        let paths: Vec<String> = files_with_tags(&[copy.id], &[])
            .unwrap()
            .into_iter()
            .map(|it| it.path)
            .collect();
        assert_eq!(vec!["/a", "/b"], paths);
        cleanup();
    }

    #[test]
    fn copy_tag_not_found() {
        init_db_folder();
        assert_eq!(CopyTagError::TagNotFound, copy_tag(5, "copy").unwrap_err());
        cleanup();
    }

    #[test]
    fn copy_tag_name_taken() {
        init_db_folder();
        let source = create_tag("source").unwrap();
        create_tag("taken").unwrap();
        assert_eq!(
            CopyTagError::NewNameAlreadyExists,
            copy_tag(source.id, "taken").unwrap_err()
        );
        cleanup();
    }
}

mod delete_tag_tests {
    use crate::files::service::{get_all_files, get_file};
    use crate::implications::service::get_all_implications;
    use crate::model::error::file_errors::GetFileError;
    use crate::model::error::tag_errors::{DeleteTagError, GetTagError};
    use crate::tags::service::{delete_tag, delete_tags, get_tag, tags_for_file};
    use crate::test::*;

    #[test]
    fn delete_tag_prunes_files_left_without_tags() {
        init_db_folder();
        let doomed = create_tag_db_entry("doomed");
        let kept = create_tag_db_entry("kept");
        let only_doomed = create_file_db_entry("/only_doomed", false);
        let both = create_file_db_entry("/both", false);
        tag_file_db_entry(only_doomed, doomed);
        tag_file_db_entry(both, doomed);
        tag_file_db_entry(both, kept);
        delete_tag(doomed).unwrap();
        assert_eq!(GetTagError::TagNotFound, get_tag(doomed).unwrap_err());
        assert_eq!(GetFileError::NotFound, get_file(only_doomed).unwrap_err());
        let remaining: Vec<String> = tags_for_file(both)
            .unwrap()
            .into_iter()
            .map(|it| it.name)
            .collect();
        assert_eq!(vec!["kept"], remaining);
        assert_eq!(1, get_all_files().unwrap().len());
        cleanup();
    }

    #[test]
    fn delete_tag_removes_implications_on_both_sides() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        create_implication_db_entry(a, b);
        create_implication_db_entry(b, c);
        delete_tag(b).unwrap();
        assert!(get_all_implications().unwrap().is_empty());
        cleanup();
    }

    #[test]
    fn delete_tag_not_found() {
        init_db_folder();
        assert_eq!(DeleteTagError::TagNotFound, delete_tag(1).unwrap_err());
        cleanup();
    }

    #[test]
    fn delete_tags_stops_at_first_failure() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let c = create_tag_db_entry("c");
        let res = delete_tags(&[a, 999, c]);
        assert_eq!(DeleteTagError::TagNotFound, res.unwrap_err());
        assert_eq!(GetTagError::TagNotFound, get_tag(a).unwrap_err());
        assert_eq!("c", get_tag(c).unwrap().name);
        cleanup();
    }
}

mod files_with_tags_tests {
    use crate::tags::service::{files_with_tags, files_with_tags_implied};
    use crate::test::*;

    fn paths(files: Vec<crate::files::FileRecord>) -> Vec<String> {
        files.into_iter().map(|it| it.path).collect()
    }

    #[test]
    fn include_and_exclude() {
        init_db_folder();
        let music = create_tag_db_entry("music");
        let rock = create_tag_db_entry("rock");
        let live = create_tag_db_entry("live");
        let studio = create_file_db_entry("/studio.ogg", false);
        let concert = create_file_db_entry("/concert.ogg", false);
        let jazz = create_file_db_entry("/jazz.ogg", false);
        tag_file_db_entry(studio, music);
        tag_file_db_entry(studio, rock);
        tag_file_db_entry(concert, music);
        tag_file_db_entry(concert, rock);
        tag_file_db_entry(concert, live);
        tag_file_db_entry(jazz, music);
        assert_eq!(
            vec!["/concert.ogg", "/studio.ogg"],
            paths(files_with_tags(&[music, rock], &[]).unwrap())
        );
        assert_eq!(
            vec!["/studio.ogg"],
            paths(files_with_tags(&[music, rock], &[live]).unwrap())
        );
        cleanup();
    }

    #[test]
    fn empty_include_matches_everything_not_excluded() {
        init_db_folder();
        let hidden = create_tag_db_entry("hidden");
        let shown = create_tag_db_entry("shown");
        let a = create_file_db_entry("/a", false);
        let b = create_file_db_entry("/b", false);
        tag_file_db_entry(a, hidden);
        tag_file_db_entry(b, shown);
        assert_eq!(vec!["/a", "/b"], paths(files_with_tags(&[], &[]).unwrap()));
        assert_eq!(vec!["/b"], paths(files_with_tags(&[], &[hidden]).unwrap()));
        cleanup();
    }

    #[test]
    fn implications_are_not_followed_unless_asked() {
        init_db_folder();
        let cat = create_tag_db_entry("cat");
        let mammal = create_tag_db_entry("mammal");
        let animal = create_tag_db_entry("animal");
        create_implication_db_entry(cat, mammal);
        create_implication_db_entry(mammal, animal);
        let tom = create_file_db_entry("/tom.jpg", false);
        tag_file_db_entry(tom, cat);
        assert!(files_with_tags(&[animal], &[]).unwrap().is_empty());
        assert_eq!(
            vec!["/tom.jpg"],
            paths(files_with_tags_implied(&[animal], &[]).unwrap())
        );
        cleanup();
    }
}

mod tags_for_tests {
    use crate::tags::service::{tags_for_file, tags_for_file_implied, tags_for_path, tags_for_tags};
    use crate::test::*;

    fn names(tags: Vec<crate::tags::Tag>) -> Vec<String> {
        tags.into_iter().map(|it| it.name).collect()
    }

    #[test]
    fn tags_for_tags_excludes_input() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let file = create_file_db_entry("/file", false);
        tag_file_db_entry(file, a);
        tag_file_db_entry(file, b);
        assert_eq!(vec!["b"], names(tags_for_tags(&[a]).unwrap()));
        cleanup();
    }

    #[test]
    fn tags_for_path_untracked() {
        init_db_folder();
        assert!(tags_for_path("/not/tracked").unwrap().is_empty());
        cleanup();
    }

    #[test]
    fn tags_for_path_and_file() {
        init_db_folder();
        let z = create_tag_db_entry("z");
        let a = create_tag_db_entry("a");
        let file = create_file_db_entry("/file", false);
        tag_file_db_entry(file, z);
        tag_file_db_entry(file, a);
        assert_eq!(vec!["a", "z"], names(tags_for_path("/file").unwrap()));
        assert_eq!(vec!["a", "z"], names(tags_for_file(file).unwrap()));
        cleanup();
    }

    #[test]
    fn tags_for_file_implied_follows_implications() {
        init_db_folder();
        let cat = create_tag_db_entry("cat");
        let mammal = create_tag_db_entry("mammal");
        let animal = create_tag_db_entry("animal");
        create_implication_db_entry(cat, mammal);
        create_implication_db_entry(mammal, animal);
        let file = create_file_db_entry("/tom.jpg", false);
        tag_file_db_entry(file, cat);
        assert_eq!(
            vec!["animal", "cat", "mammal"],
            names(tags_for_file_implied(file).unwrap())
        );
        cleanup();
    }
}
