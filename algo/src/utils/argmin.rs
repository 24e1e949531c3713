/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Returns the index of the minimum value in an iterator of floats, or
/// [`None`] if the iterator is empty.
///
/// Values are compared using [`f64::total_cmp`], so NaNs never make the
/// comparison fail (positive NaNs are larger than every number). If the
/// minimum appears several times, this method returns the position of the
/// first instance.
///
/// # Examples
///
/// ```
/// # use webrank_algo::utils::math::argmin;
/// let v = vec![4.0, 3.0, 1.0, 0.0, 5.0, 0.0];
/// let index = argmin(v);
/// assert_eq!(index, Some(3));
/// ```
pub fn argmin<I: IntoIterator<Item = f64>>(iter: I) -> Option<usize> {
    iter.into_iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}

/// Returns the index of the minimum value of `key` over the elements of an
/// iterator, or [`None`] if the iterator is empty.
///
/// # Examples
///
/// ```
/// # use webrank_algo::utils::math::argmin_by_key;
/// let v = vec![-4.0_f64, 3.0, -1.5, 2.0];
/// let index = argmin_by_key(&v, |x| x.abs());
/// assert_eq!(index, Some(2));
/// ```
pub fn argmin_by_key<I: IntoIterator>(
    iter: I,
    mut key: impl FnMut(&I::Item) -> f64,
) -> Option<usize> {
    iter.into_iter()
        .enumerate()
        .map(|(idx, x)| (idx, key(&x)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmin_empty() {
        assert_eq!(argmin(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_argmin_nan() {
        assert_eq!(argmin([f64::NAN, 2.0, 1.0]), Some(2));
    }
}
