/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use webrank_algo::utils::math::*;

mod test_argmin {
    use super::*;

    #[test]
    fn test_single_element() {
        assert_eq!(argmin([f64::MAX]), Some(0));
    }

    #[test]
    fn test_normal() {
        assert_eq!(argmin([2.0, 1.0, 5.0, 3.0]), Some(1));
    }

    #[test]
    fn test_duplicates() {
        assert_eq!(argmin([2.0, -1.0, 5.0, -1.0]), Some(1));
    }

    #[test]
    fn test_infinities() {
        assert_eq!(argmin([f64::INFINITY, 3.0, f64::NEG_INFINITY]), Some(2));
    }

    #[test]
    fn test_by_key_empty() {
        assert_eq!(argmin_by_key(Vec::<i32>::new(), |&x| x as f64), None);
    }

    #[test]
    fn test_by_key_distance() {
        // Closest to 1
        let v = [0.2_f64, 1.3, 0.95, -1.0];
        assert_eq!(argmin_by_key(v, |&x| (x - 1.0).abs()), Some(2));
    }
}

mod test_is_close {
    use super::*;

    #[test]
    fn test_zero() {
        assert!(is_close(0.0, 0.0, 1E-9));
        assert!(!is_close(0.0, 1E-300, 0.5));
    }

    #[test]
    fn test_relative() {
        assert!(is_close(100.0, 101.0, 0.01));
        assert!(!is_close(100.0, 102.0, 0.01));
        assert!(is_close(1E-6, 1.001E-6, 0.01));
        assert!(!is_close(1E-6, 2E-6, 0.01));
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(is_close(1.0, 1.015, 0.015), is_close(1.015, 1.0, 0.015));
    }
}

mod test_l_inf_distance {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(l_inf_distance(&[], &[]), 0.0);
    }

    #[test]
    fn test_normal() {
        assert_eq!(l_inf_distance(&[0.5, 0.25, 0.25], &[0.25, 0.25, 0.5]), 0.25);
    }

    #[test]
    #[should_panic]
    fn test_different_lengths() {
        l_inf_distance(&[1.0], &[1.0, 2.0]);
    }
}
