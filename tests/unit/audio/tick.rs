use super::*;

#[test]
fn counting_ticks_accumulate() {
    let mut t = CountingTicks::default();
    t.tick().unwrap();
    t.tick().unwrap();
    assert_eq!(t.count, 2);
}

#[test]
fn bell_writes_bel_byte() {
    let mut bell = BellTicks::new(Vec::new());
    bell.tick().unwrap();
    assert_eq!(bell.into_inner(), vec![0x07]);
}

struct Broken;

impl Write for Broken {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("no device"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn bell_failure_is_an_error_value() {
    let err = BellTicks::new(Broken).tick().unwrap_err();
    assert!(err.to_string().contains("no device"));
}

#[test]
fn boxed_sinks_forward() {
    let mut b: Box<dyn TickSink> = Box::new(NullTicks);
    assert!(b.tick().is_ok());
}
