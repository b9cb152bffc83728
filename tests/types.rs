// ABOUTME: Integration tests for validated remotes, digests, and byte sizes.
// ABOUTME: Property tests cover the shapes a remote URL can take.

use gitship::types::*;
use proptest::prelude::*;

mod remote_repository {
    use super::*;

    #[test]
    fn owner_and_name_from_each_shape() {
        for remote in [
            "git@github.com:acme/site.git",
            "git@github.com:acme/site",
            "https://github.com/acme/site.git",
            "http://git.example.com/acme/site/",
        ] {
            let repo = RemoteRepository::new(remote).unwrap();
            assert_eq!(repo.owner_and_name(), ("acme", "site"), "{remote}");
        }
    }

    #[test]
    fn rejection_names_the_value() {
        let err = RemoteRepository::new("file:///srv/git/site.git").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`file:///srv/git/site.git` is not a valid SSH or HTTP(S) git remote"
        );
    }

    #[test]
    fn nested_groups_are_rejected() {
        assert!(RemoteRepository::new("https://gitlab.com/acme/web/site.git").is_err());
    }

    proptest! {
        #[test]
        fn ssh_remotes_round_trip(
            host in "[a-z]{1,10}\\.(com|org|io)",
            owner in "[a-zA-Z0-9_-]{1,20}",
            name in "[a-zA-Z0-9_-]{1,20}",
        ) {
            let remote = format!("git@{host}:{owner}/{name}.git");
            let repo = RemoteRepository::new(&remote).unwrap();
            prop_assert_eq!(repo.as_str(), remote.as_str());
            prop_assert_eq!(repo.owner_and_name(), (owner.as_str(), name.as_str()));
        }

        #[test]
        fn anything_without_a_scheme_is_rejected(path in "/[a-z/]{0,30}") {
            prop_assert!(RemoteRepository::new(&path).is_err());
        }
    }
}

mod digests {
    use super::*;

    #[test]
    fn workspace_names_differ_per_remote() {
        assert_ne!(
            short_digest("git@github.com:acme/site.git"),
            short_digest("https://github.com/acme/site.git")
        );
    }

    proptest! {
        #[test]
        fn always_sixteen_hex_chars(input in ".*") {
            let digest = short_digest(&input);
            prop_assert_eq!(digest.len(), 16);
            prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}

mod byte_size {
    use super::*;

    #[test]
    fn displays_archive_sizes() {
        assert_eq!(ByteSize(0).to_string(), "0 bytes");
        assert_eq!(ByteSize(2048).to_string(), "2.00 KB");
        assert_eq!(ByteSize(5 * 1024 * 1024 + 512 * 1024).to_string(), "5.50 MB");
    }
}
