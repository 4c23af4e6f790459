mod implications_for_tags_tests {
    use crate::implications::service::{expand_tag_ids, implications_for_tags};
    use crate::repository::open_connection;
    use crate::test::*;

    #[test]
    fn follows_implications_transitively() {
        init_db_folder();
        let cat = create_tag_db_entry("cat");
        let mammal = create_tag_db_entry("mammal");
        let animal = create_tag_db_entry("animal");
        let unrelated = create_tag_db_entry("unrelated");
        create_implication_db_entry(cat, mammal);
        create_implication_db_entry(mammal, animal);
        create_implication_db_entry(unrelated, animal);
        let edges: Vec<(u32, u32)> = implications_for_tags(&[cat])
            .unwrap()
            .iter()
            .map(|it| it.edge())
            .collect();
        assert_eq!(vec![(cat, mammal), (mammal, animal)], edges);
        cleanup();
    }

    #[test]
    fn shared_implied_tags_are_only_walked_once() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        let d = create_tag_db_entry("d");
        create_implication_db_entry(a, b);
        create_implication_db_entry(a, c);
        create_implication_db_entry(b, d);
        create_implication_db_entry(c, d);
        let edges = implications_for_tags(&[a]).unwrap();
        assert_eq!(4, edges.len());
        cleanup();
    }

    #[test]
    fn terminates_on_a_cycle_already_in_the_database() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        // the service refuses to do this, so it has to be done behind its back
        create_implication_db_entry(a, b);
        create_implication_db_entry(b, a);
        let edges = implications_for_tags(&[a]).unwrap();
        assert_eq!(2, edges.len());
        cleanup();
    }

    #[test]
    fn no_implications() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        assert!(implications_for_tags(&[a]).unwrap().is_empty());
        assert!(implications_for_tags(&[]).unwrap().is_empty());
        cleanup();
    }

    #[test]
    fn expand_tag_ids_includes_input() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        let alone = create_tag_db_entry("alone");
        create_implication_db_entry(a, b);
        create_implication_db_entry(b, c);
        let con = open_connection();
        let mut expanded = expand_tag_ids(&[a, alone], &con).unwrap();
        con.close().unwrap();
        expanded.sort();
        assert_eq!(vec![a, b, c, alone], expanded);
        cleanup();
    }
}

mod add_implication_tests {
    use crate::implications::service::{add_implication, get_all_implications};
    use crate::model::error::implication_errors::ImplicationError;
    use crate::test::*;

    fn edges() -> Vec<(u32, u32)> {
        get_all_implications()
            .unwrap()
            .iter()
            .map(|it| it.edge())
            .collect()
    }

    #[test]
    fn add_implication_success() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        add_implication(a, b).unwrap();
        assert_eq!(vec![(a, b)], edges());
        cleanup();
    }

    #[test]
    fn adding_existing_implication_does_nothing() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        add_implication(a, b).unwrap();
        add_implication(a, b).unwrap();
        assert_eq!(vec![(a, b)], edges());
        cleanup();
    }

    #[test]
    fn self_implication_is_circular() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        assert_eq!(
            ImplicationError::CircularImplication,
            add_implication(a, a).unwrap_err()
        );
        assert!(edges().is_empty());
        cleanup();
    }

    #[test]
    fn transitive_cycle_is_rejected() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        add_implication(a, b).unwrap();
        add_implication(b, c).unwrap();
        assert_eq!(
            ImplicationError::CircularImplication,
            add_implication(c, a).unwrap_err()
        );
        assert_eq!(vec![(a, b), (b, c)], edges());
        cleanup();
    }

    #[test]
    fn missing_tag() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        assert_eq!(
            ImplicationError::TagNotFound(42),
            add_implication(a, 42).unwrap_err()
        );
        assert_eq!(
            ImplicationError::TagNotFound(42),
            add_implication(42, a).unwrap_err()
        );
        cleanup();
    }
}

mod remove_implication_tests {
    use crate::implications::service::{
        get_all_implications, remove_implication, remove_implications_for_tag,
    };
    use crate::test::*;

    #[test]
    fn remove_implication_only_removes_that_edge() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        create_implication_db_entry(a, b);
        create_implication_db_entry(a, c);
        remove_implication(a, b).unwrap();
        let edges: Vec<(u32, u32)> = get_all_implications()
            .unwrap()
            .iter()
            .map(|it| it.edge())
            .collect();
        assert_eq!(vec![(a, c)], edges);
        cleanup();
    }

    #[test]
    fn remove_missing_implication_is_fine() {
        init_db_folder();
        remove_implication(1, 2).unwrap();
        cleanup();
    }

    #[test]
    fn remove_implications_for_tag_removes_both_directions() {
        init_db_folder();
        let a = create_tag_db_entry("a");
        let b = create_tag_db_entry("b");
        let c = create_tag_db_entry("c");
        let d = create_tag_db_entry("d");
        create_implication_db_entry(a, b);
        create_implication_db_entry(b, c);
        create_implication_db_entry(c, d);
        remove_implications_for_tag(b).unwrap();
        let edges: Vec<(u32, u32)> = get_all_implications()
            .unwrap()
            .iter()
            .map(|it| it.edge())
            .collect();
        assert_eq!(vec![(c, d)], edges);
        cleanup();
    }
}
