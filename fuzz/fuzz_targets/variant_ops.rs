#![no_main]

use libfuzzer_sys::fuzz_target;
use netvariant::Variant;

fn next(data: &mut &[u8]) -> u8 {
    let Some((&b, rest)) = data.split_first() else {
        return 0;
    };
    *data = rest;
    b
}

/// Decodes one value from the front of `data`. Repeat counts stay small so that string
/// multiplication cannot exhaust memory.
fn decode(data: &mut &[u8], depth: u8) -> Variant {
    if data.is_empty() {
        return Variant::Nil;
    }
    let tag = next(data);

    match tag % 8 {
        0 => Variant::Nil,
        1 => Variant::from(next(data) % 16),
        2 => Variant::from(i8::from_le_bytes([next(data)])),
        3 => Variant::from(f64::from(next(data)) / 4.0 - 16.0),
        4 => Variant::from(next(data) & 1 == 1),
        5 => {
            let len = usize::from(next(data) % 8);
            let text: String = (0..len).map(|_| char::from(b'a' + next(data) % 3)).collect();
            Variant::from(text)
        }
        6 if depth < 3 => {
            let len = next(data) % 4;
            let mut dict = Variant::empty_dict();
            for _ in 0..len {
                let key = Variant::from(next(data) % 8);
                let value = decode(data, depth + 1);
                dict.insert(key, value);
            }
            dict
        }
        _ => Variant::empty_str(),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut input = data;
    let left = decode(&mut input, 0);
    let right = decode(&mut input, 0);

    let _ = left == right;
    let _ = left < right;
    let _ = left.cmp(&right);

    for result in [&left + &right, &left - &right, &left * &right, &left / &right] {
        let mut copy = Variant::Nil;
        copy.assign(&result);
        let _ = copy.to_string();
    }
    let _ = left.checked_div(&right);
});
