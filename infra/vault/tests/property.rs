pub mod fixtures;

use finman_vault::prelude::*;
use finman_vault::{BLOCK_LEN, TAG_HEX_LEN};
use fixtures::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn envelope_roundtrips_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let envelope = Envelope::new(&setup_keys());
        let blob = envelope.encrypt(&data).unwrap();
        prop_assert_eq!(blob.len(), BLOCK_LEN + data.len());
        prop_assert_eq!(envelope.decrypt(&blob).unwrap(), data);
    }

    #[test]
    fn tags_verify_arbitrary_messages(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let tagger = Tagger::new(&setup_keys()).unwrap();
        let payload = tagger.add_tag(&data);
        let check = tagger.verify_tag(&payload);
        prop_assert!(check.valid);
        prop_assert_eq!(check.message, data.as_slice());
    }

    #[test]
    fn any_single_byte_change_invalidates_tag(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        position in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let tagger = Tagger::new(&setup_keys()).unwrap();
        let mut payload = tagger.add_tag(&data);
        let i = position.index(payload.len());
        payload[i] ^= flip;

        let check = tagger.verify_tag(&payload);
        prop_assert!(!check.valid);
        prop_assert_eq!(check.message.len(), data.len());
        prop_assert_eq!(check.into_message(), None);
    }

    #[test]
    fn short_payloads_never_verify(data in proptest::collection::vec(any::<u8>(), 0..TAG_HEX_LEN)) {
        let tagger = Tagger::new(&setup_keys()).unwrap();
        prop_assert!(!tagger.verify_tag(&data).valid);
    }

    #[test]
    fn sealed_payloads_open(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let vault = setup_vault();
        let sealed = vault.seal(&data).unwrap();
        prop_assert_eq!(vault.open(&sealed).unwrap(), data);
    }
}
