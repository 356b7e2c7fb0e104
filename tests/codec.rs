use robotiq_rs::*;

/// Status block a device would answer after accepting `request`.
fn echo(request: &ActionRequest) -> [u8; 6] {
    GripperStatus {
        activation: if request.activate {
            ActivationStatus::Activated
        } else {
            ActivationStatus::Reset
        },
        motion: if request.go_to {
            MotionStatus::GoToActive
        } else {
            MotionStatus::Idle
        },
        gripper: GripperPhase::Complete,
        object: ObjectStatus::AtRequestedPosition,
        fault_status: 0,
        controller_fault: 0,
        requested_position: request.position,
        current_position: request.position,
        current: 0,
    }
    .encode()
}

#[test]
fn device_echo_reproduces_request_fields() {
    for flags in 0..4u8 {
        for value in [0x00, 0x01, 0x7F, 0x80, 0xFE, 0xFF] {
            let request = ActionRequest::new()
                .activate(flags & 1 != 0)
                .go_to(flags & 2 != 0)
                .position(value)
                .speed(value.wrapping_add(3))
                .force(!value);

            let status = GripperStatus::decode(&echo(&request));
            assert_eq!(status.activation == ActivationStatus::Activated, request.activate);
            assert_eq!(status.motion == MotionStatus::GoToActive, request.go_to);
            assert_eq!(status.requested_position, request.position);
            assert_eq!(status.current_position, request.position);

            assert_eq!(ActionRequest::decode(&request.encode()), request);
        }
    }
}

#[test]
fn encoding_is_deterministic_and_keeps_reserved_bytes_clear() {
    let request = ActionRequest::new()
        .activate(true)
        .auto_release(true)
        .release_direction(AutoReleaseDirection::Open)
        .position(0x12)
        .speed(0x34)
        .force(0x56);
    let bytes = request.encode();
    assert_eq!(bytes, request.encode());
    assert_eq!(bytes, [0x31, 0x00, 0x00, 0x12, 0x34, 0x56]);
    assert_eq!(bytes[0] & 0b1100_0110, 0);
}

#[test]
fn every_status_block_decodes() {
    for head in 0..=u8::MAX {
        let status = GripperStatus::decode(&[head, 0xAA, 0x3C, 1, 2, 3]);
        assert_eq!(status.fault_status, 0x0C);
        assert_eq!(status.controller_fault, 0x03);
        assert_eq!(status.fault(), Some(GripperFault::InternalFault));
    }
}
