use super::*;
use quickcheck_macros::quickcheck;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{collections::BTreeMap, format, prelude::v1::*, rc::Rc, vec};

fn height_bound(len: usize) -> usize {
    (2.0 * ((len + 1) as f64).log2()).floor() as usize
}

#[test]
fn insert_contains_remove() {
    let mut tree = BalancedTree::new();
    assert!(tree.is_empty());

    for key in [10, 20, 30] {
        assert_eq!(tree.insert(key, key * 2), None);
    }
    tree.raw.validate();
    assert_eq!(tree.len(), 3);
    assert!(tree.contains(&20));
    assert_eq!(tree.get(&30), Some(&60));

    assert_eq!(tree.remove(&10), Ok(20));
    tree.raw.validate();
    assert_eq!(tree.len(), 2);
    assert!(!tree.contains(&10));

    assert_eq!(tree.remove(&999), Err(Error::NotFound));
    assert_eq!(tree.len(), 2);
}

#[test]
fn get_missing() {
    let mut tree: BalancedTree<u32, u32> = BalancedTree::new();
    assert_eq!(tree.get(&1), None);
    assert_eq!(tree.get_mut(&1), None);
    assert_eq!(tree.get_key_value(&1), None);
    assert_eq!(tree.remove(&1), Err(Error::NotFound));
    assert_eq!(tree.remove_entry(&1), Err(Error::NotFound));

    tree.insert(2, 4);
    assert_eq!(tree.get(&1), None);
    assert_eq!(tree.get(&3), None);
}

#[test]
fn remove_missing_leaves_tree_unchanged() {
    let mut tree: BalancedTree<u32, u32> = (0..64).map(|i| (i * 2, i)).collect();
    let before = tree.raw.dump_string();

    for key in [1, 63, 127, 1000] {
        assert_eq!(tree.remove(&key), Err(Error::NotFound));
    }

    assert_eq!(tree.raw.dump_string(), before);
    assert_eq!(tree.len(), 64);
}

#[test]
fn insert_overwrites_duplicate() {
    let mut tree = BalancedTree::new();
    assert_eq!(tree.insert("k", 1), None);
    assert_eq!(tree.insert("k", 2), Some(1));
    assert_eq!(tree.insert("k", 3), Some(2));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get("k"), Some(&3));
    tree.raw.validate();
}

#[test]
fn insert_keeps_original_key() {
    // Equal under `Ord` but distinguishable
    #[derive(Debug)]
    struct Tagged(u32, &'static str);
    impl PartialEq for Tagged {
        fn eq(&self, o: &Self) -> bool {
            self.0 == o.0
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, o: &Self) -> Option<core::cmp::Ordering> {
            Some(self.cmp(o))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, o: &Self) -> core::cmp::Ordering {
            self.0.cmp(&o.0)
        }
    }

    let mut tree = BalancedTree::new();
    tree.insert(Tagged(1, "first"), 'a');
    tree.insert(Tagged(1, "second"), 'b');
    let (key, value) = tree.get_key_value(&Tagged(1, "probe")).unwrap();
    assert_eq!(key.1, "first");
    assert_eq!(*value, 'b');
}

#[test]
fn all_equal_keys_collapse() {
    let mut tree = BalancedTree::new();
    for i in 0..1000 {
        tree.insert(7u8, i);
        tree.raw.validate();
    }
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[&7], 999);
    assert_eq!(tree.remove(&7), Ok(999));
    assert!(tree.is_empty());
    assert_eq!(tree.raw.root(), None);
}

#[test]
fn try_insert_rejects_duplicate() {
    let mut tree = BalancedTree::new();
    assert_eq!(tree.try_insert(1, "a"), Ok(()));
    assert_eq!(tree.try_insert(2, "b"), Ok(()));
    let before = tree.raw.dump_string();

    assert_eq!(tree.try_insert(1, "c"), Err(Error::DuplicateKey));
    assert_eq!(tree.raw.dump_string(), before);
    assert_eq!(tree.get(&1), Some(&"a"));
    assert_eq!(tree.len(), 2);
}

#[test]
fn get_mut_updates_in_place() {
    let mut tree: BalancedTree<u32, Vec<u32>> = BalancedTree::new();
    tree.insert(5, vec![]);
    tree.get_mut(&5).unwrap().push(1);
    tree.get_mut(&5).unwrap().push(2);
    assert_eq!(tree[&5], [1, 2]);
}

#[test]
fn borrowed_lookup() {
    let mut tree = BalancedTree::new();
    tree.insert(String::from("apple"), 1);
    tree.insert(String::from("banana"), 2);
    assert!(tree.contains("apple"));
    assert_eq!(tree.get("banana"), Some(&2));
    assert_eq!(tree.remove_entry("apple"), Ok((String::from("apple"), 1)));
    assert!(!tree.contains("apple"));
}

#[test]
#[should_panic(expected = "no entry found for the key")]
fn index_missing_panics() {
    let tree: BalancedTree<u32, u32> = BalancedTree::new();
    let _value = tree[&1];
}

#[test]
fn debug_is_ordered() {
    let tree: BalancedTree<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    assert_eq!(format!("{:?}", tree), "{1: 'a', 2: 'b', 3: 'c'}");
    assert_eq!(format!("{:?}", BalancedTree::<u8, u8>::new()), "{}");
}

#[test]
fn clone_is_independent() {
    let mut tree: BalancedTree<u32, u32> = (0..100).map(|i| (i, i)).collect();
    let snapshot = tree.clone();

    for key in 0..50 {
        tree.remove(&key).unwrap();
    }
    tree.insert(1000, 1000);

    snapshot.raw.validate();
    assert_eq!(snapshot.len(), 100);
    assert!((0..100).all(|key| snapshot.get(&key) == Some(&key)));
    assert!(!snapshot.contains(&1000));
    tree.raw.validate();
    assert_eq!(tree.len(), 51);
}

#[test]
fn clear_and_drop_release_values() {
    let value = Rc::new(());
    let mut tree = BalancedTree::new();
    for key in 0..100 {
        tree.insert(key, Rc::clone(&value));
    }
    assert_eq!(Rc::strong_count(&value), 101);

    drop(tree.remove(&0));
    assert_eq!(Rc::strong_count(&value), 100);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(Rc::strong_count(&value), 1);

    for key in 0..100 {
        tree.insert(key, Rc::clone(&value));
    }
    drop(tree);
    assert_eq!(Rc::strong_count(&value), 1);
}

#[test]
fn extend_follows_update_policy() {
    let mut tree = BalancedTree::new();
    tree.extend(vec![(1, 'a'), (2, 'b'), (1, 'c')]);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[&1], 'c');
}

#[test]
fn ascending_stress() {
    const LEN: u32 = 100_000;
    const SAMPLE: u32 = 4999;

    let mut tree = BalancedTree::new();
    for key in 0..LEN {
        tree.insert(key, key);
        if key % SAMPLE == 0 {
            tree.raw.validate();
        }
    }
    tree.raw.validate();
    assert_eq!(tree.len(), LEN as usize);
    assert!(tree.raw.height() <= height_bound(LEN as usize));

    for key in 0..LEN {
        assert_eq!(tree.remove(&key), Ok(key));
        if key % SAMPLE == 0 {
            tree.raw.validate();
        }
    }
    assert!(tree.is_empty());
    assert_eq!(tree.raw.root(), None);
    assert!((0..LEN).step_by(997).all(|key| !tree.contains(&key)));
}

#[test]
fn shuffled_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut keys: Vec<i64> = (-2000..2000).collect();
    keys.shuffle(&mut rng);

    let mut tree = BalancedTree::new();
    for &key in keys.iter() {
        tree.insert(key, -key);
    }
    tree.raw.validate();
    assert!(tree.raw.height() <= height_bound(keys.len()));
    assert!(keys.iter().all(|key| tree.get(key) == Some(&-key)));

    keys.shuffle(&mut rng);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(tree.remove(key), Ok(-key));
        if i % 97 == 0 {
            tree.raw.validate();
        }
    }
    assert!(tree.is_empty());
    assert!(keys.iter().all(|key| !tree.contains(key)));
}

#[quickcheck]
fn qc_balanced_tree(cmds: Vec<u8>) {
    let mut cmds = cmds.into_iter();
    let mut subject = BalancedTree::new();
    let mut reference = BTreeMap::new();

    log::info!("cmds = {:?}", cmds);

    (|| -> Option<()> {
        while let Some(cmd) = cmds.next() {
            let key = cmds.next()? % 64;
            match cmd % 4 {
                0 => {
                    log::debug!("remove({:?})", key);
                    let expected = reference.remove(&key).ok_or(Error::NotFound);
                    assert_eq!(subject.remove(&key), expected);
                }
                1 => {
                    log::debug!("try_insert({:?}, {:?})", key, cmd);
                    let expected = if reference.contains_key(&key) {
                        Err(Error::DuplicateKey)
                    } else {
                        reference.insert(key, cmd);
                        Ok(())
                    };
                    assert_eq!(subject.try_insert(key, cmd), expected);
                }
                _ => {
                    log::debug!("insert({:?}, {:?})", key, cmd);
                    assert_eq!(subject.insert(key, cmd), reference.insert(key, cmd));
                }
            }

            log::trace!("Tree = \n{}", subject.raw.dump_string());

            // Validate the tree after each command
            subject.raw.validate();

            assert_eq!(subject.len(), reference.len());
            for key in 0..64 {
                assert_eq!(subject.get(&key), reference.get(&key));
            }
        }

        Some(())
    })();
}
