use newt_msg::*;

#[derive(Debug, PartialEq, PartialOrd, Ord, Eq, Clone, Copy)]
pub struct TestInput {
  pub tkl: u8,
  pub n_opts: usize,
  pub opt_size: usize,
  pub payload_size: usize,
}

impl TestInput {
  pub fn get_bytes(&self) -> Vec<u8> {
    self.get_message().try_into_bytes().unwrap()
  }

  pub fn get_message(&self) -> Message<'static> {
    self.into()
  }
}

impl<'a> From<&'a TestInput> for Message<'static> {
  fn from(inp: &'a TestInput) -> Message<'static> {
    let opts: Vec<_> =
      (0..inp.n_opts).map(|n| Opt::new(OptNumber(100 + n as u16),
                                       core::iter::repeat(1u8).take(inp.opt_size)
                                                              .collect::<Vec<_>>()))
                     .collect();

    let token = core::iter::repeat(1u8).take(inp.tkl as _)
                                       .collect::<tinyvec::ArrayVec<[_; 8]>>();

    Message { id: Id(1),
              ty: Type::Non,
              ver: Default::default(),
              token: Token(token),
              code: Code::CONTENT,
              opts,
              payload: Payload::from(core::iter::repeat(1u8).take(inp.payload_size)
                                                            .collect::<Vec<_>>()) }
  }
}

pub fn inputs() -> Vec<TestInput> {
  vec![TestInput { tkl: 0,
                   n_opts: 0,
                   opt_size: 0,
                   payload_size: 0 },
       TestInput { tkl: 4,
                   n_opts: 4,
                   opt_size: 8,
                   payload_size: 16 },
       TestInput { tkl: 4,
                   n_opts: 8,
                   opt_size: 32,
                   payload_size: 16 },
       TestInput { tkl: 8,
                   n_opts: 8,
                   opt_size: 64,
                   payload_size: 128 },
       TestInput { tkl: 8,
                   n_opts: 16,
                   opt_size: 64,
                   payload_size: 512 },
       TestInput { tkl: 8,
                   n_opts: 32,
                   opt_size: 256,
                   payload_size: 1024 },]
}
