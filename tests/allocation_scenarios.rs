#[cfg(test)]
mod allocation_scenarios {
    use cidr_findr::ip::allocator::{find_subnets, AllocationError};
    use cidr_findr::ip::range::{block_size, AddressRange};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const NONE: &[&str] = &[];

    fn range(cidr: &str) -> AddressRange {
        AddressRange::parse_cidr(cidr).unwrap()
    }

    fn check(network: &str, subnets: &[&str], requests: &[u8], expected: &[&str]) {
        let actual = find_subnets(&[network], subnets, requests).unwrap();
        assert_eq!(actual, expected, "network {} subnets {:?} requests {:?}", network, subnets, requests);
    }

    #[test]
    fn test_no_subnets() {
        check("10.0.0.0/16", NONE, &[24], &["10.0.0.0/24"]);
    }

    #[test]
    fn test_one_subnet() {
        check("10.0.0.0/16", &["10.0.0.0/24"], &[24], &["10.0.1.0/24"]);
    }

    #[test]
    fn test_two_adjacent_at_start() {
        check("10.0.0.0/16", &["10.0.0.0/24", "10.0.1.0/24"], &[24], &["10.0.2.0/24"]);
        check(
            "10.0.0.0/16",
            &["10.0.0.0/24", "10.0.1.0/24"],
            &[24, 24],
            &["10.0.2.0/24", "10.0.3.0/24"],
        );
    }

    #[test]
    fn test_different_sizes() {
        // the /25 goes back into the gap left before the /24
        check("10.0.0.0/16", &["10.0.0.0/25"], &[24, 25], &["10.0.1.0/24", "10.0.0.128/25"]);
    }

    #[test]
    fn test_unordered_subnets() {
        check(
            "172.31.0.0/16",
            &["172.31.48.0/20", "172.31.0.0/20", "172.31.16.0/20", "172.31.32.0/20"],
            &[24],
            &["172.31.64.0/24"],
        );
    }

    #[test]
    fn test_middle_gap() {
        check("192.168.1.0/24", &["192.168.1.0/26", "192.168.1.128/25"], &[26], &["192.168.1.64/26"]);
    }

    #[test]
    fn test_gap_at_start() {
        check("10.0.0.0/24", &["10.0.0.128/25"], &[25], &["10.0.0.0/25"]);
    }

    #[test]
    fn test_no_requests() {
        check("10.0.0.0/24", &["10.0.0.0/25"], &[], &[]);
    }

    #[test]
    fn test_network_too_small() {
        assert_eq!(
            find_subnets(&["10.0.0.0/25"], NONE, &[24]),
            Err(AllocationError::SizeTooLarge { requested: 24, network: 25 })
        );
    }

    #[test]
    fn test_network_full() {
        assert_eq!(
            find_subnets(&["10.0.0.0/24"], &["10.0.0.0/24"], &[26]),
            Err(AllocationError::InsufficientSpace { requested: 26 })
        );
    }

    #[test]
    fn test_insufficient_space() {
        assert_eq!(
            find_subnets(&["10.0.0.0/24"], &["10.0.0.64/25"], &[25]),
            Err(AllocationError::InsufficientSpace { requested: 25 })
        );
    }

    #[test]
    fn test_failure_in_later_request_fails_whole_call() {
        assert_eq!(
            find_subnets(&["10.0.0.0/24"], NONE, &[25, 25, 25]),
            Err(AllocationError::InsufficientSpace { requested: 25 })
        );
    }

    #[test]
    fn test_subnets_outside_network_ignored() {
        check("10.0.0.0/24", &["10.0.1.0/24", "192.168.0.0/16"], &[25], &["10.0.0.0/25"]);
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..1000 {
            let prefix: u8 = rng.gen_range(0..=32);
            let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
            let base = rng.gen::<u32>() & mask;

            let cidr = AddressRange::from_base_and_size(base, prefix).unwrap().to_cidr();
            let parsed = range(&cidr);
            assert_eq!(range(&parsed.to_cidr()), parsed);
            assert_eq!(parsed.base(), base);
            assert_eq!(parsed.prefix_length(), prefix);
        }
    }

    /// Random aligned blocks inside `parent`, overlapping each other freely
    fn random_subnets(rng: &mut StdRng, parent: &AddressRange, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                let prefix = rng.gen_range(parent.prefix_length() + 1..=32u8.min(parent.prefix_length() + 8));
                let slots = parent.size() / block_size(prefix);
                let offset = rng.gen_range(0..slots) * block_size(prefix);
                let base = u32::try_from(u64::from(parent.base()) + offset).unwrap();
                AddressRange::from_base_and_size(base, prefix).unwrap().to_cidr()
            })
            .collect()
    }

    #[test]
    fn test_allocations_never_overlap_and_are_first_fit() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut successes = 0;

        for _ in 0..300 {
            let parent_prefix: u8 = rng.gen_range(16..=24);
            let parent = AddressRange::from_base_and_size(0x0A00_0000, parent_prefix).unwrap();
            let parent_cidr = parent.to_cidr();

            let subnet_count = rng.gen_range(0..12);
            let subnets = random_subnets(&mut rng, &parent, subnet_count);

            let request_count = rng.gen_range(1..6);
            let requests: Vec<u8> = (0..request_count)
                .map(|_| rng.gen_range(parent_prefix + 1..=32u8.min(parent_prefix + 6)))
                .collect();

            let result = find_subnets(&[parent_cidr.as_str()], &subnets, &requests);

            // identical inputs, identical outputs
            assert_eq!(result, find_subnets(&[parent_cidr.as_str()], &subnets, &requests));

            let Ok(allocated) = result else {
                continue;
            };
            successes += 1;
            assert_eq!(allocated.len(), requests.len());

            let mut obstacles: Vec<AddressRange> = subnets.iter().map(|s| range(s)).collect();

            for (cidr, requested) in allocated.iter().zip(&requests) {
                let block = range(cidr);
                assert_eq!(block.prefix_length(), *requested);
                assert!(u64::from(block.base()) >= u64::from(parent.base()));
                assert!(block.top() <= parent.top());

                for obstacle in &obstacles {
                    assert!(!block.overlaps(obstacle), "{} overlaps {}", block, obstacle);
                }

                // every lower candidate was taken
                let step = block_size(*requested);
                let mut lower = u64::from(parent.base());
                while lower < u64::from(block.base()) {
                    let candidate = AddressRange::from_base_and_size(lower as u32, *requested).unwrap();
                    assert!(
                        obstacles.iter().any(|o| candidate.overlaps(o)),
                        "{} was free but {} was returned",
                        candidate,
                        block
                    );
                    lower += step;
                }

                obstacles.push(block);
            }
        }

        assert!(successes > 0);
    }

    #[test]
    fn test_multiple_networks_never_overlap() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let networks = ["10.0.0.0/22", "10.0.8.0/23", "9.0.0.0/24"];
            let mut subnets = Vec::new();
            for network in &networks {
                let count = rng.gen_range(0..4);
                subnets.extend(random_subnets(&mut rng, &range(network), count));
            }
            let requests: Vec<u8> = (0..rng.gen_range(1..8)).map(|_| rng.gen_range(25..=28)).collect();

            let Ok(allocated) = find_subnets(&networks, &subnets, &requests) else {
                continue;
            };

            let mut taken: Vec<AddressRange> = subnets.iter().map(|s| range(s)).collect();
            for cidr in &allocated {
                let block = range(cidr);
                assert!(networks.iter().any(|n| {
                    let n = range(n);
                    block.base() >= n.base() && block.top() <= n.top()
                }));
                assert!(taken.iter().all(|t| !block.overlaps(t)), "{} overlaps", block);
                taken.push(block);
            }
        }
    }
}
