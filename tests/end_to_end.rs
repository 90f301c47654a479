use csr_bfs::{Csr, EdgeRecord, GraphError};

/// Observes the crate's `log::debug!` instrumentation (CSR build phases,
/// BFS direction switches) under `cargo test -- --nocapture`.
fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn pool(n: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new().num_threads(n).build().unwrap()
}

fn edges(pairs: &[(i64, i64)]) -> Vec<EdgeRecord> {
    pairs.iter().map(|&(a, b)| EdgeRecord::new(a, b, 1.0)).collect()
}

fn assert_csr_invariants(csr: &Csr) {
    for u in 0..csr.num_vertices() {
        let nbrs = csr.neighbors(u).unwrap();
        assert!(
            nbrs.windows(2).all(|w| w[0] < w[1]),
            "neighbor list of {u} is not strictly increasing: {nbrs:?}"
        );
        assert!(!nbrs.contains(&(u as i64)), "{u} appears in its own neighbor list");
        for &v in nbrs {
            let back = csr.neighbors(v as usize).unwrap();
            assert!(back.contains(&(u as i64)), "edge {u}->{v} is not symmetric");
        }
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn triangle() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&edges(&[(0, 1), (1, 2), (2, 0)]), &p).unwrap();
        assert_csr_invariants(&csr);
        let parent = csr_bfs::bfs_tree(&csr, 0, &p).unwrap();
        assert!(parent.iter().all(|&p| p != -1));
    }

    #[test]
    fn path_of_five() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&edges(&[(0, 1), (1, 2), (2, 3), (3, 4)]), &p).unwrap();
        assert_csr_invariants(&csr);
        let parent = csr_bfs::bfs_tree(&csr, 0, &p).unwrap();

        for v in 0..5usize {
            let mut cur = v;
            let mut depth = 0;
            while cur != 0 {
                cur = parent[cur] as usize;
                depth += 1;
                assert!(depth <= 4);
            }
            assert_eq!(depth, v, "vertex {v} should be at hop distance {v} from source 0");
        }
    }

    #[test]
    fn star_rooted_off_center() {
        init_logging();
        let p = pool(4);
        // Hub is vertex 0; leaves are 1..=5.
        let csr = Csr::from_edges(
            &edges(&[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]),
            &p,
        )
        .unwrap();
        assert_csr_invariants(&csr);

        let parent = csr_bfs::bfs_tree(&csr, 3, &p).unwrap();
        assert_eq!(parent[3], 3);
        assert_eq!(parent[0], 3);
        for leaf in [1i64, 2, 4, 5] {
            assert_eq!(parent[leaf as usize], 0);
        }
    }

    #[test]
    fn self_loops_and_duplicate_edges() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(
            &edges(&[(0, 0), (0, 1), (0, 1), (1, 0), (1, 1), (1, 2)]),
            &p,
        )
        .unwrap();
        assert_csr_invariants(&csr);
        assert_eq!(csr.neighbors(0).unwrap(), &[1]);
        assert_eq!(csr.neighbors(1).unwrap(), &[0, 2]);

        let parent = csr_bfs::bfs_tree(&csr, 0, &p).unwrap();
        assert_eq!(parent[0], 0);
        assert_eq!(parent[1], 0);
        assert_eq!(parent[2], 1);
    }

    #[test]
    fn disconnected_components() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&edges(&[(0, 1), (1, 2), (3, 4)]), &p).unwrap();
        assert_csr_invariants(&csr);

        let parent = csr_bfs::bfs_tree(&csr, 0, &p).unwrap();
        assert_eq!(parent[0], 0);
        assert_eq!(parent[1], 0);
        assert_eq!(parent[2], 1);
        assert_eq!(parent[3], -1);
        assert_eq!(parent[4], -1);
    }

    #[test]
    fn dense_k6_forces_bottom_up() {
        init_logging();
        let p = pool(4);
        let mut pairs = Vec::new();
        for i in 0..6i64 {
            for j in (i + 1)..6i64 {
                pairs.push((i, j));
            }
        }
        let csr = Csr::from_edges(&edges(&pairs), &p).unwrap();
        assert_csr_invariants(&csr);

        let parent = csr_bfs::bfs_tree(&csr, 0, &p).unwrap();
        for v in 1..6usize {
            assert_ne!(parent[v], -1);
            assert!(csr.neighbors(v).unwrap().contains(&(parent[v])));
        }
    }
}

#[cfg(test)]
mod quantified_invariants {
    use super::*;

    fn ring(n: i64) -> Vec<EdgeRecord> {
        let pairs: Vec<(i64, i64)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        edges(&pairs)
    }

    #[test]
    fn bfs_parent_validity_and_reachability() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&ring(12), &p).unwrap();
        let parent = csr_bfs::bfs_tree(&csr, 5, &p).unwrap();

        assert_eq!(parent[5], 5);
        for v in 0..csr.num_vertices() {
            if parent[v] == -1 {
                continue;
            }
            if v != 5 {
                assert!(csr.neighbors(v).unwrap().contains(&parent[v]));
            }
        }
        // A ring is fully connected, so every vertex must be reached.
        assert!(parent.iter().all(|&p| p != -1));
    }

    #[test]
    fn bfs_is_idempotent_in_reachable_set_and_depth() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&ring(20), &p).unwrap();

        let depth_of = |parent: &[i64]| -> Vec<usize> {
            (0..parent.len())
                .map(|v| {
                    let mut cur = v;
                    let mut d = 0;
                    while cur != 5 {
                        cur = parent[cur] as usize;
                        d += 1;
                    }
                    d
                })
                .collect()
        };

        let first = csr_bfs::bfs_tree(&csr, 5, &p).unwrap();
        let second = csr_bfs::bfs_tree(&csr, 5, &p).unwrap();

        assert_eq!(
            first.iter().map(|&v| v != -1).collect::<Vec<_>>(),
            second.iter().map(|&v| v != -1).collect::<Vec<_>>()
        );
        assert_eq!(depth_of(&first), depth_of(&second));
    }

    #[test]
    fn out_of_range_source_reports_vertex_out_of_range() {
        init_logging();
        let p = pool(4);
        let csr = Csr::from_edges(&edges(&[(0, 1)]), &p).unwrap();
        let err = csr_bfs::bfs_tree(&csr, 100, &p).unwrap_err();
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 100,
                num_vertices: 2
            }
        );
    }

    #[test]
    fn empty_edge_list_is_rejected() {
        init_logging();
        let p = pool(4);
        let err = Csr::from_edges(&[], &p).unwrap_err();
        assert_eq!(err, GraphError::EmptyEdgeList);
    }
}
