use std::collections::HashMap;

/// Delta encoding for ascending position lists
///
/// `[p0, p1, p2, ...]` becomes `[p0, p1-p0, p2-p1, ...]`; the empty list
/// maps to the empty list. Decode is the inverse prefix sum.
pub struct DeltaEncoder;

impl DeltaEncoder {
    pub fn encode(positions: &[u32]) -> Vec<u32> {
        if positions.is_empty() {
            return Vec::new();
        }

        let mut output = Vec::with_capacity(positions.len());
        output.push(positions[0]);
        for i in 1..positions.len() {
            output.push(positions[i].wrapping_sub(positions[i - 1]));
        }
        output
    }

    pub fn decode(deltas: &[u32]) -> Vec<u32> {
        let mut output = Vec::with_capacity(deltas.len());
        let mut prev = 0u32;
        for (i, &delta) in deltas.iter().enumerate() {
            let value = if i == 0 { delta } else { prev.wrapping_add(delta) };
            output.push(value);
            prev = value;
        }
        output
    }

    /// Encode every position list of a two-level index in place.
    pub fn encode_index(index: &mut HashMap<String, HashMap<String, Vec<u32>>>) {
        for record in index.values_mut() {
            for positions in record.values_mut() {
                *positions = Self::encode(positions);
            }
        }
    }

    /// Inverse of `encode_index`.
    pub fn decode_index(index: &mut HashMap<String, HashMap<String, Vec<u32>>>) {
        for record in index.values_mut() {
            for positions in record.values_mut() {
                *positions = Self::decode(positions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_first_value_then_differences() {
        assert_eq!(DeltaEncoder::encode(&[3, 7, 9, 20]), vec![3, 4, 2, 11]);
        assert_eq!(DeltaEncoder::decode(&[3, 4, 2, 11]), vec![3, 7, 9, 20]);
    }

    #[test]
    fn empty_list_round_trips() {
        assert_eq!(DeltaEncoder::encode(&[]), Vec::<u32>::new());
        assert_eq!(DeltaEncoder::decode(&[]), Vec::<u32>::new());
    }

    #[test]
    fn singleton_round_trips() {
        assert_eq!(DeltaEncoder::encode(&[42]), vec![42]);
        assert_eq!(DeltaEncoder::decode(&[42]), vec![42]);
    }

    #[test]
    fn ascending_lists_round_trip() {
        let cases: Vec<Vec<u32>> = vec![
            vec![1],
            vec![1, 2, 3, 4, 5],
            vec![5, 100, 101, 4000],
            (1..200).collect(),
        ];
        for positions in cases {
            let decoded = DeltaEncoder::decode(&DeltaEncoder::encode(&positions));
            assert_eq!(decoded, positions);
        }
    }

    #[test]
    fn index_encode_decode_round_trips() {
        let mut index: HashMap<String, HashMap<String, Vec<u32>>> = HashMap::new();
        index
            .entry("dog".to_string())
            .or_default()
            .insert("1".to_string(), vec![3, 7, 9, 20]);
        index
            .entry("dog".to_string())
            .or_default()
            .insert("3".to_string(), vec![1, 3]);

        let original = index.clone();
        DeltaEncoder::encode_index(&mut index);
        assert_eq!(index["dog"]["1"], vec![3, 4, 2, 11]);
        DeltaEncoder::decode_index(&mut index);
        assert_eq!(index, original);
    }
}
