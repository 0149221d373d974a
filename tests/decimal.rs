use adc_serial::{bin_to_dec, Digits};

fn triple(v: u8) -> (u8, u8, u8) {
    let d = bin_to_dec(v);
    (d.hundreds, d.tens, d.ones)
}

#[test]
fn boundaries() {
    assert_eq!(triple(0), (0, 0, 0));
    assert_eq!(triple(9), (0, 0, 9));
    assert_eq!(triple(10), (0, 1, 0));
    assert_eq!(triple(99), (0, 9, 9));
    assert_eq!(triple(100), (1, 0, 0));
    assert_eq!(triple(200), (2, 0, 0));
    assert_eq!(triple(255), (2, 5, 5));
}

#[test]
fn repeated_calls_agree() {
    for v in [0, 37, 128, 255] {
        assert_eq!(bin_to_dec(v), bin_to_dec(v));
        assert_eq!(Digits::from(v), bin_to_dec(v));
    }
}

#[test]
fn converts_back() {
    let d = Digits {
        hundreds: 1,
        tens: 2,
        ones: 3,
    };
    assert_eq!(u8::from(d), 123);
    assert_eq!(d.to_ascii(), *b"123");
}

#[test]
fn usable_in_const_context() {
    const MAX: Digits = bin_to_dec(u8::MAX);
    assert_eq!(MAX.to_ascii(), *b"255");
}
