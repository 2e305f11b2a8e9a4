/// SHDLC checksum: the one's complement of the 8-bit wrapping sum of the
/// header sum, the length byte and every payload byte.
///
/// `header_sum` is `address + command` for requests and
/// `address + command + state` for responses. The checksum always covers
/// logical (unstuffed) bytes.
pub fn checksum(header_sum: u8, declared_length: u8, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(header_sum.wrapping_add(declared_length), |acc, &byte| {
            acc.wrapping_add(byte)
        });
    !sum
}
