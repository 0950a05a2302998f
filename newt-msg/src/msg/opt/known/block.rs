/// Three items of information may need to be transferred in a
/// Block (Block1 or Block2) option:
/// * the size of the block ([`Block::size`])
/// * whether more blocks are following ([`Block::more`])
/// * the relative number of the block ([`Block::num`]) within a sequence of blocks with the given size.
///
/// See [RFC7959 - Block-Wise Transfers](https://datatracker.ietf.org/doc/html/rfc7959#section-2.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Block(u32);

impl Block {
  /// Create a block value from its block number, "more" flag and
  /// size exponent (`size = 2^(szx + 4)`, `szx` in `0..=6`)
  ///
  /// ```
  /// use newt_msg::opt::known::Block;
  ///
  /// let b = Block::new(2, true, 2);
  /// assert_eq!(b.size(), 64);
  /// assert_eq!(u32::from(b), 0b10_1_010);
  /// ```
  pub fn new(num: u32, more: bool, szx: u8) -> Self {
    let num = (num & 0x000F_FFFF) << 4;
    let more = u32::from(more) << 3;
    let szx = u32::from(szx.min(6));

    Self(num | more | szx)
  }

  /// Size exponent; 7 is reserved and read as 6
  pub fn szx(&self) -> u8 {
    (self.0 & 0b111).min(6) as u8
  }

  /// Block size in bytes (16 to 1024)
  pub fn size(&self) -> u16 {
    2u16.pow(self.szx() as u32 + 4)
  }

  /// Whether more blocks follow this one
  pub fn more(&self) -> bool {
    (self.0 & 0b1000) >> 3 == 1
  }

  /// Block number
  pub fn num(&self) -> u32 {
    self.0 >> 4
  }
}

impl From<Block> for u32 {
  fn from(b: Block) -> Self {
    b.0
  }
}

impl From<u32> for Block {
  fn from(n: u32) -> Self {
    Block(n)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn block() {
    let b = Block::from(33);
    assert_eq!(b.size(), 32);
    assert_eq!(b.num(), 2);
    assert!(!b.more());

    let b = Block::from(59);
    assert_eq!(b.size(), 128);
    assert_eq!(b.num(), 3);
    assert!(b.more());

    let b = Block::from(0b1111);
    assert_eq!(b.size(), 1024);
  }
}
